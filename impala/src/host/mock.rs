use std::cell::RefCell;
use std::collections::BTreeSet;

use snafu::ensure;
use tracing::trace;

use crate::{
    AccountName, Action, BinarySerializable, Bytes, SerializeError,
    binaryserializable::{from_bin_exact, to_bin},
};
use super::{AuthorizationDeniedSnafu, Host, HostError, RecipientNotNotifiedSnafu};


/// An in-memory [`Host`], to run contract code outside of a blockchain node.
///
/// It is configured with the data of the action being executed, the accounts
/// that authorized it and the accounts notified of it, and records all the
/// inline actions sent. Aborting panics with the abort message.
///
/// ```
/// # use impala::{MockHost, Name, host::{require_auth, require_recipients}};
/// let alice = Name::constant("alice");
/// let bob = Name::constant("bob");
///
/// let host = MockHost::new()
///     .with_authorization(alice)
///     .with_recipient(alice);
///
/// assert!(require_auth(&host, alice).is_ok());
/// assert!(require_recipients(&host, [alice, bob]).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockHost {
    action_data: Vec<u8>,
    authorized: BTreeSet<AccountName>,
    recipients: BTreeSet<AccountName>,
    sent: RefCell<Vec<Bytes>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw data of the current action.
    pub fn with_action_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.action_data = data.into();
        self
    }

    /// Set the data of the current action to the packed representation of `payload`.
    pub fn with_action<T: BinarySerializable>(self, payload: &T) -> Self {
        self.with_action_data(to_bin(payload))
    }

    pub fn with_authorization(mut self, account: AccountName) -> Self {
        self.authorized.insert(account);
        self
    }

    pub fn with_recipient(mut self, account: AccountName) -> Self {
        self.recipients.insert(account);
        self
    }

    /// Return the packed inline actions that have been sent, in order.
    pub fn sent(&self) -> Vec<Bytes> {
        self.sent.borrow().clone()
    }

    /// Return the inline actions that have been sent, in order.
    pub fn sent_actions(&self) -> Result<Vec<Action>, SerializeError> {
        self.sent.borrow().iter()
            .map(|packed| from_bin_exact::<Action>(packed))
            .collect()
    }
}

impl Host for MockHost {
    fn read_action(&self, buffer: &mut [u8]) -> usize {
        let n = buffer.len().min(self.action_data.len());
        buffer[..n].copy_from_slice(&self.action_data[..n]);
        trace!(n, "read action data");
        n
    }

    fn action_size(&self) -> usize {
        self.action_data.len()
    }

    fn require_auth(&self, account: AccountName) -> Result<(), HostError> {
        ensure!(self.authorized.contains(&account), AuthorizationDeniedSnafu { account });
        Ok(())
    }

    fn require_recipient(&self, account: AccountName) -> Result<(), HostError> {
        ensure!(self.recipients.contains(&account), RecipientNotNotifiedSnafu { account });
        Ok(())
    }

    fn send_inline(&self, packed_action: &[u8]) {
        self.sent.borrow_mut().push(Bytes::from(packed_action));
    }

    fn abort(&self, message: &str) -> ! {
        panic!("{message}")
    }
}
