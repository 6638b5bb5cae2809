//!
//! Envelope types for actions: the [`Action`] itself, the [`PermissionLevel`]s
//! making up its authorization list, and the [`Contract`] trait binding a
//! payload type to the account and action name it is dispatched to.
//!

pub mod action;

pub use action::{Action, ActionError, Contract, IntoPermissionVec, PermissionLevel};
