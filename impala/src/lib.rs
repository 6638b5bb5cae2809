//!
//! This library provides the types and functions needed by [Antelope](https://antelope.io)
//! smart contracts to read the action they are executing, check its authorizations
//! and recipients, and send new actions to other contracts.
//!
//! At its core is the binary format in which actions and their payloads are packed,
//! which needs to be reproduced exactly to interoperate with the blockchain and
//! other contracts. See the [`binaryserializable`] module for a description.
//!
//! # Overview
//!
//!  - payload types implement [`BinarySerializable`], usually by deriving it with the
//!    [`BinarySerializable`](macro@BinarySerializable) derive macro, which also
//!    implements [`Reflect`] to expose the list of their fields
//!  - payload types implement [`Contract`] to bind them to the account and name
//!    of the action they are sent as, usually using the [`contract`](macro@contract) macro
//!  - an [`Action`] is built from a payload and a list of [`PermissionLevel`]s, and
//!    sent using [`Action::send()`]
//!  - the action currently executing is read using [`host::unpack_action()`] or,
//!    for plain-old-data types only, [`host::current_action()`]
//!  - all of this goes through a [`Host`]: [`WasmHost`] when running in the blockchain
//!    node, [`MockHost`] when running tests
//!
//! # Example
//!
//! ```
//! use impala::{Action, BinarySerializable, MockHost, Name, PermissionLevel, contract};
//! use impala::host::{require_auth, unpack_action};
//!
//! #[contract(account="hello", name="hi")]
//! #[derive(BinarySerializable, Debug, PartialEq)]
//! pub struct Hi {
//!     pub user: Name,
//! }
//!
//! #[contract(account="notifier", name="notify")]
//! #[derive(BinarySerializable)]
//! pub struct Notify {
//!     pub user: Name,
//!     pub message: String,
//! }
//!
//! fn apply(host: &MockHost) -> Result<(), impala::HostError> {
//!     let hi: Hi = unpack_action(host)?;
//!     require_auth(host, hi.user)?;
//!
//!     let notify = Notify { user: hi.user, message: format!("hi {}", hi.user) };
//!     Action::new(PermissionLevel::new(Name::constant("hello"), Name::constant("active")), &notify)
//!         .send(host);
//!     Ok(())
//! }
//!
//! let alice = Name::constant("alice");
//! let host = MockHost::new()
//!     .with_action(&Hi { user: alice })
//!     .with_authorization(alice);
//!
//! apply(&host)?;
//! assert_eq!(host.sent_actions()?[0].name, Name::constant("notify"));
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```
//!
//! # Feature flags
//!
//! - `cli`: whether to compile the command-line tools alongside the library.
//!          This feature is enabled by default and installs the `impalaconv` tool.
//! - `detailed-error`: activate this to enable the [`macro@with_location`] macro. If
//!                     not enabled, the [`macro@with_location`] macro will be a no-op.
//!
//! # `impalaconv` CLI tool
//!
//! The `impalaconv` tool converts action envelopes between their JSON and packed
//! hex representations, and shows the fields of the envelope types.
//!
//! ```sh
//! $ impalaconv pack action '{"account": "eosio.token", "name": "transfer", "authorization": [{"actor": "alice", "permission": "active"}], "data": ""}'
//! $ impalaconv describe permission_level
//! ```

// this is needed to be able to call the derive macros, which refer to the `impala` crate
extern crate self as impala;

pub mod binaryserializable;
pub mod bytestream;
pub mod chain;
pub mod config;
pub mod error;
pub mod host;
pub mod reflect;
pub mod types;

pub use serde_json::Value as JsonValue;

pub use binaryserializable::{BinarySerializable, SerializeError, to_bin, to_hex, from_bin, from_hex};
pub use bytestream::{ByteStream, StreamError};
pub use chain::*;
pub use host::{Host, HostError, MockHost, OrAbort};
#[cfg(target_arch = "wasm32")]
pub use host::WasmHost;
pub use reflect::{FieldDescriptor, Reflect};
pub use types::*;

/// Add a `location` field to all variants of a `Snafu` error enum
///
/// This will add the `location` field to all variants, which need to be either
/// structs or the unit type (tuple variants are not allowed).
/// The location field will be automatically populated when using the error selector.
///
/// This macro will also update the display string (if defined) to also show the
/// location that has been captured.
///
/// **NOTE:** you cannot use a `whatever` variant in conjunction with this, nor can you
///           manually define the `location` field yourself (it will conflict with the
///           generated one).
pub use impala_macros::with_location;

/// Attribute macro to easily declare structs representing contract actions.
///
/// This implements the [`Contract`] trait so that this struct can be used
/// to build an [`Action`]. Invalid names are rejected at compile time.
///
/// # Example
///
/// ```
/// # use impala::{Name, BinarySerializable, Contract, contract};
/// #[contract(account="eosio.token", name="transfer")]
/// #[derive(BinarySerializable)]
/// pub struct Transfer {
///     pub from: Name,
///     pub to: Name,
///     pub quantity: i64,
///     pub memo: String,
/// }
///
/// assert_eq!(Transfer::account(), Name::constant("eosio.token"));
/// ```
pub use impala_macros::contract;

/// Implement the [`BinarySerializable`](trait@BinarySerializable) trait
///
/// For structs, this calls [`BinarySerializable::to_bin()`] and
/// [`BinarySerializable::from_bin()`] on all members sequentially, and also
/// implements the [`Reflect`] trait listing those members.
///
/// For enums, each variant needs to be either a unit variant or hold exactly
/// one value, and is encoded as its index (as a [`VarUint32`]) followed by that
/// value if any.
pub use impala_macros::BinarySerializable;
