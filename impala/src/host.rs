//! Access to the runtime executing the contract.
//!
//! The runtime exposes a handful of calls, modelled by the [`Host`] trait:
//! reading the data of the action currently being executed, checking
//! authorizations and recipients, and queuing new inline actions. Those calls
//! are synchronous and the contract code is never reentered while they run.
//!
//! On top of them, this module provides the typed operations used by contracts:
//!
//!  - [`unpack_action()`] decodes the action data using its
//!    [`BinarySerializable`] implementation. This works for any type.
//!  - [`current_action()`] copies the action data straight into a value of
//!    a plain-old-data type. This only works for types whose in-memory layout
//!    is exactly their binary representation: no padding, no variable-length
//!    fields (strings, vectors, bytes). The [`Pod`] bound enforces the first
//!    part but not the second: a mismatching schema of the same size will be
//!    read without any error.
//!  - [`require_auth()`], [`require_recipient()`] and [`require_recipients()`]
//!
//! Sending an action is done using [`Action::send()`](crate::Action::send).
//!
//! All errors are fatal for the current action: the contract entry point is
//! expected to pass them to [`Host::abort()`], which [`OrAbort::or_abort()`]
//! does conveniently.

mod mock;
#[cfg(target_arch = "wasm32")]
mod wasm;

use std::error::Error;
use std::mem::size_of;

use bytemuck::{bytes_of_mut, Pod};
use snafu::{ensure, Report, ResultExt, Snafu};
use tracing::{debug, warn};

use impala_macros::with_location;

use crate::{AccountName, BinarySerializable, ByteStream, SerializeError};

pub use mock::MockHost;
#[cfg(target_arch = "wasm32")]
pub use wasm::WasmHost;


#[with_location]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HostError {
    #[snafu(display("action shorter than expected: read {read} byte(s), expected at least {expected}"))]
    ShortRead { expected: usize, read: usize },

    #[snafu(display("action size mismatch: action has {actual} byte(s), expected {expected}"))]
    SizeMismatch { expected: usize, actual: usize },

    #[snafu(display("missing authority of {account}"))]
    AuthorizationDenied { account: AccountName },

    #[snafu(display("{account} is not in the set of notified recipients"))]
    RecipientNotNotified { account: AccountName },

    #[snafu(display("cannot unpack action data"))]
    Unpack { source: SerializeError },
}


/// The calls provided by the runtime to a contract.
pub trait Host {
    /// Copy the data of the current action into `buffer`, up to its length.
    /// Return the number of bytes copied.
    fn read_action(&self, buffer: &mut [u8]) -> usize;

    /// Return the size of the data of the current action.
    fn action_size(&self) -> usize;

    /// Check that `account` has authorized the current action.
    fn require_auth(&self, account: AccountName) -> Result<(), HostError>;

    /// Check that `account` is part of the set of accounts notified of the current action.
    fn require_recipient(&self, account: AccountName) -> Result<(), HostError>;

    /// Queue a packed action to be executed after the current one.
    fn send_inline(&self, packed_action: &[u8]);

    /// Abort the execution of the current action. All its effects are reverted.
    fn abort(&self, message: &str) -> !;
}


/// Reinterpret the data of the current action as a value of type `T`.
///
/// Fails with [`HostError::ShortRead`] if the action data is shorter than `T`.
/// Action data longer than `T` is accepted and the remaining bytes are ignored,
/// use [`current_action_exact()`] to reject it.
///
/// ```
/// # use impala::{MockHost, host::current_action};
/// # use bytemuck::{Pod, Zeroable};
/// #[repr(C)]
/// #[derive(Clone, Copy, Pod, Zeroable)]
/// struct Counter {
///     owner: u64,
///     value: u64,
/// }
///
/// let host = MockHost::new().with_action_data(vec![1, 0, 0, 0, 0, 0, 0, 0, 42, 0, 0, 0, 0, 0, 0, 0]);
/// let counter: Counter = current_action(&host)?;
/// assert_eq!((counter.owner, counter.value), (1, 42));
/// # Ok::<(), impala::HostError>(())
/// ```
pub fn current_action<T: Pod>(host: &impl Host) -> Result<T, HostError> {
    let expected = size_of::<T>();
    let mut value = T::zeroed();
    let read = host.read_action(bytes_of_mut(&mut value));
    ensure!(read >= expected, ShortReadSnafu { expected, read });
    Ok(value)
}

/// Reinterpret the data of the current action as a value of type `T`, requiring
/// the action data to be exactly the size of `T`.
pub fn current_action_exact<T: Pod>(host: &impl Host) -> Result<T, HostError> {
    let expected = size_of::<T>();
    let actual = host.action_size();
    ensure!(actual == expected, SizeMismatchSnafu { expected, actual });
    current_action(host)
}

/// Decode the data of the current action as a value of type `T`.
///
/// Bytes left over after decoding are ignored.
pub fn unpack_action<T: BinarySerializable>(host: &impl Host) -> Result<T, HostError> {
    let mut buffer = vec![0u8; host.action_size()];
    let read = host.read_action(&mut buffer);
    buffer.truncate(read);

    let mut stream = ByteStream::from(buffer);
    let value = T::from_bin(&mut stream).context(UnpackSnafu)?;

    let leftover = stream.leftover().len();
    if leftover != 0 {
        warn!(leftover, "action data has not been fully consumed");
    }
    Ok(value)
}

/// Check that `account` has authorized the current action.
pub fn require_auth(host: &impl Host, account: AccountName) -> Result<(), HostError> {
    debug!(%account, "checking authorization");
    host.require_auth(account)
}

/// Check that `account` is part of the set of accounts notified of the current action.
pub fn require_recipient(host: &impl Host, account: AccountName) -> Result<(), HostError> {
    debug!(%account, "checking recipient");
    host.require_recipient(account)
}

/// Check that all the given accounts are part of the set of accounts notified
/// of the current action.
///
/// Accounts are checked in order and this stops at the first one that is missing.
pub fn require_recipients<I>(host: &impl Host, accounts: I) -> Result<(), HostError>
where
    I: IntoIterator<Item = AccountName>,
{
    for account in accounts {
        require_recipient(host, account)?;
    }
    Ok(())
}


/// Turn errors into an abort of the current action.
pub trait OrAbort<T> {
    fn or_abort(self, host: &impl Host) -> T;
}

impl<T, E: Error + 'static> OrAbort<T> for Result<T, E> {
    fn or_abort(self, host: &impl Host) -> T {
        match self {
            Ok(value) => value,
            Err(e) => host.abort(&Report::from_error(e).to_string()),
        }
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================
