use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use snafu::{IntoError, Snafu};
use tracing::{debug, instrument};

use impala_macros::with_location;

use crate::{
    AccountName, ActionName, PermissionName, BinarySerializable, Bytes, JsonValue,
    SerializeError, host::Host, impl_auto_error_conversion,
    binaryserializable::{from_bin_exact, from_hex, to_bin},
};


// see: https://github.com/AntelopeIO/spring/blob/main/libraries/chain/include/eosio/chain/action.hpp

/// Bind a payload type to the account and action name it is dispatched to.
///
/// You will usually implement this using the [`contract`](macro@crate::contract)
/// attribute macro.
pub trait Contract: BinarySerializable {
    fn account() -> AccountName;
    fn name() -> ActionName;
}

/// A pair of actor and permission, one entry of the authorization list of an [`Action`].
///
/// Its binary representation is the actor followed by the permission, 16 bytes in total.
#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, Deserialize, Serialize, BinarySerializable)]
pub struct PermissionLevel {
    pub actor: AccountName,
    pub permission: PermissionName,
}

impl PermissionLevel {
    pub fn new(actor: AccountName, permission: PermissionName) -> Self {
        PermissionLevel { actor, permission }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.actor, self.permission)
    }
}

pub trait IntoPermissionVec {
    fn into_permission_vec(self) -> Vec<PermissionLevel>;
}

impl IntoPermissionVec for Vec<PermissionLevel> {
    fn into_permission_vec(self) -> Vec<PermissionLevel> {
        self
    }
}

impl<const N: usize> IntoPermissionVec for [PermissionLevel; N] {
    fn into_permission_vec(self) -> Vec<PermissionLevel> {
        self.into()
    }
}

impl IntoPermissionVec for PermissionLevel {
    fn into_permission_vec(self) -> Vec<PermissionLevel> {
        vec![self]
    }
}

impl IntoPermissionVec for (AccountName, PermissionName) {
    fn into_permission_vec(self) -> Vec<PermissionLevel> {
        vec![PermissionLevel::new(self.0, self.1)]
    }
}


#[with_location]
#[derive(Debug, Snafu)]
pub enum ActionError {
    #[snafu(display("could not convert between JSON and action"))]
    Json { source: JsonError },

    #[snafu(display("could not decode action data"))]
    Data { source: SerializeError },
}

impl_auto_error_conversion!(ActionError {
    JsonError => JsonSnafu,
    SerializeError => DataSnafu,
});


/// An action is a typed message addressed to a contract: the handler defined by
/// `account` is called with the action `name` and the packed payload in `data`.
///
/// The `authorization` list declares which actors (and with which permission)
/// approve the action. It is checked by the host in the order given, and is
/// kept as is: it is neither sorted nor deduplicated.
///
/// Its binary representation is:
///
/// ```text
/// account (8 bytes) ++ name (8 bytes)
///     ++ varuint32 count ++ count × permission level (16 bytes each)
///     ++ varuint32 len ++ len bytes of data
/// ```
///
/// The action never looks into `data`, the receiving contract needs to know
/// which payload type to decode it into.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Default, Deserialize, Serialize, BinarySerializable)]
pub struct Action {
    pub account: AccountName,
    pub name: ActionName,
    pub authorization: Vec<PermissionLevel>,
    pub data: Bytes,
}

impl Action {
    /// Build an action from its payload, which also determines its target
    /// account and action name.
    ///
    /// # Example
    ///
    /// ```
    /// # use impala::{Action, BinarySerializable, Name, PermissionLevel, contract};
    /// #[contract(account="eosio.token", name="transfer")]
    /// #[derive(BinarySerializable)]
    /// pub struct Transfer {
    ///     pub from: Name,
    ///     pub to: Name,
    ///     pub quantity: i64,
    ///     pub memo: String,
    /// }
    ///
    /// let alice = Name::constant("alice");
    /// let transfer = Transfer { from: alice, to: Name::constant("bob"), quantity: 1, memo: "hi".into() };
    /// let action = Action::new(PermissionLevel::new(alice, Name::constant("active")), &transfer);
    ///
    /// assert_eq!(action.account.to_string(), "eosio.token");
    /// assert_eq!(action.name.to_string(), "transfer");
    /// assert_eq!(action.authorization.len(), 1);
    /// ```
    pub fn new<T: Contract>(authorization: impl IntoPermissionVec, payload: &T) -> Action {
        Action {
            account: T::account(),
            name: T::name(),
            authorization: authorization.into_permission_vec(),
            data: to_bin(payload),
        }
    }

    /// Replace the data of this action with the packed representation of the given payload.
    ///
    /// This doesn't change `account` nor `name`.
    pub fn with_data<T: BinarySerializable>(mut self, payload: &T) -> Self {
        self.data = to_bin(payload);
        self
    }

    /// Decode the data of this action as the given payload type.
    ///
    /// The whole data needs to be consumed by the decoding, otherwise this
    /// returns a [`SerializeError::TrailingData`] error.
    pub fn decode_data<T: BinarySerializable>(&self) -> Result<T, SerializeError> {
        from_bin_exact(&self.data)
    }

    /// Return the binary representation of the whole envelope.
    pub fn packed(&self) -> Bytes {
        to_bin(self)
    }

    /// Pack this action and hand it over to the host to be executed
    /// after the current action, as part of the same transaction.
    ///
    /// This returns as soon as the host has queued the action, whether it
    /// succeeds or not is only known later when the host executes it.
    #[instrument(skip_all, fields(account = %self.account, name = %self.name))]
    pub fn send(&self, host: &impl Host) {
        let packed = self.packed();
        debug!(size = packed.len(), "sending inline action");
        host.send_inline(packed.as_ref());
    }

    /// Decode an action from the hex representation of its packed envelope.
    pub fn from_hex(hex_repr: impl AsRef<[u8]>) -> Result<Action, ActionError> {
        Ok(from_hex(hex_repr)?)
    }

    pub fn from_json(action: &JsonValue) -> Result<Action, ActionError> {
        Ok(Action::deserialize(action)?)
    }

    pub fn from_json_array(actions: &JsonValue) -> Result<Vec<Action>, ActionError> {
        Ok(Vec::<Action>::deserialize(actions)?)
    }

    pub fn to_json(&self) -> Result<JsonValue, ActionError> {
        Ok(serde_json::to_value(self)?)
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use color_eyre::eyre::Result;
    use serde_json::json;

    use crate::{Name, Reflect, FieldDescriptor, binaryserializable::to_hex};
    use super::*;

    #[test]
    fn permission_level_display() -> Result<()> {
        let p = PermissionLevel::new(Name::new("alice")?, Name::new("active")?);
        assert_eq!(p.to_string(), "alice@active");
        Ok(())
    }

    #[test]
    fn envelope_descriptors() {
        assert_eq!(PermissionLevel::TYPE_NAME, "PermissionLevel");
        assert_eq!(PermissionLevel::FIELDS, [
            FieldDescriptor { name: "actor", type_name: "AccountName" },
            FieldDescriptor { name: "permission", type_name: "PermissionName" },
        ]);

        assert_eq!(Action::field_names().collect::<Vec<_>>(),
                   ["account", "name", "authorization", "data"]);
        assert_eq!(Action::FIELDS[2].type_name, "Vec<PermissionLevel>");
    }

    #[test]
    fn json_roundtrip() -> Result<()> {
        let json = json!({
            "account": "eosio.token",
            "name": "transfer",
            "authorization": [{ "actor": "alice", "permission": "active" }],
            "data": "0102ff",
        });

        let action = Action::from_json(&json)?;
        assert_eq!(action.account, Name::new("eosio.token")?);
        assert_eq!(action.authorization[0].actor, Name::new("alice")?);
        assert_eq!(action.data, Bytes(vec![1, 2, 0xff]));

        assert_eq!(action.to_json()?, json);

        let actions = Action::from_json_array(&json!([json, json]))?;
        assert_eq!(actions, [action.clone(), action]);
        Ok(())
    }

    #[test]
    fn json_invalid_name() {
        let json = json!({
            "account": "Not.Valid",
            "name": "transfer",
            "authorization": [],
            "data": "",
        });
        assert!(matches!(Action::from_json(&json), Err(ActionError::Json { .. })));
    }

    #[test]
    fn packed_hex() -> Result<()> {
        let action = Action::from_json(&json!({
            "account": "eosio",
            "name": "active",
            "authorization": [],
            "data": "ff",
        }))?;
        let hex = action.packed().to_hex();
        assert_eq!(hex, "0000000000ea3055\
                         00000000a8ed3232\
                         00\
                         01ff");
        assert_eq!(Action::from_hex(&hex)?, action);

        assert!(matches!(Action::from_hex(&hex[..hex.len() - 2]), Err(ActionError::Data { .. })));
        assert!(matches!(Action::from_hex("zz"), Err(ActionError::Data { .. })));
        Ok(())
    }

    #[test]
    fn decode_data_rejects_trailing_bytes() -> Result<()> {
        let action = Action::default().with_data(&(7_u32));
        assert_eq!(to_hex(&action.data), "0407000000");
        assert_eq!(action.decode_data::<u32>()?, 7);
        assert!(matches!(action.decode_data::<u16>(), Err(SerializeError::TrailingData { leftover: 2, .. })));
        Ok(())
    }
}
