//! Compile-time configuration of the crate.

/// Version of the crate, as given by `git describe` when building from a git
/// checkout, or by the crate version otherwise.
pub const VERSION: &str = include_str!(concat!(env!("OUT_DIR"), "/version"));

/// Whether errors capture the location where they have been created
/// (`detailed-error` feature).
pub const DETAILED_ERRORS: bool = cfg!(feature = "detailed-error");
