use crate::AccountName;
use super::{Host, HostError};


// see: eoslib/action.h and eoslib/system.h
#[link(wasm_import_module = "env")]
extern "C" {
    fn read_action(msg: *mut u8, len: u32) -> u32;
    fn action_size() -> u32;
    fn require_auth(name: u64);
    fn require_recipient(name: u64);
    fn send_inline(serialized_action: *const u8, size: u32);
    fn eosio_assert_message(test: u32, msg: *const u8, msg_len: u32);
}


/// The [`Host`] provided by the runtime when the contract runs as a wasm module.
///
/// Failed checks never return: the runtime aborts the action by itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct WasmHost;

impl Host for WasmHost {
    fn read_action(&self, buffer: &mut [u8]) -> usize {
        // SAFETY: the runtime writes at most `len` bytes into `msg`
        unsafe { read_action(buffer.as_mut_ptr(), buffer.len() as u32) as usize }
    }

    fn action_size(&self) -> usize {
        // SAFETY: no arguments, no memory is accessed
        unsafe { action_size() as usize }
    }

    fn require_auth(&self, account: AccountName) -> Result<(), HostError> {
        // SAFETY: plain value argument
        unsafe { require_auth(account.as_u64()) };
        Ok(())
    }

    fn require_recipient(&self, account: AccountName) -> Result<(), HostError> {
        // SAFETY: plain value argument
        unsafe { require_recipient(account.as_u64()) };
        Ok(())
    }

    fn send_inline(&self, packed_action: &[u8]) {
        // SAFETY: the runtime only reads `size` bytes from `serialized_action`
        unsafe { send_inline(packed_action.as_ptr(), packed_action.len() as u32) }
    }

    fn abort(&self, message: &str) -> ! {
        // SAFETY: the runtime only reads `msg_len` bytes from `msg`
        unsafe { eosio_assert_message(0, message.as_ptr(), message.len() as u32) };
        // not reached, the runtime stops executing the contract on a failed assertion
        std::process::abort()
    }
}
