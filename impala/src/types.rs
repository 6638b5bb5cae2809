//! Base types used in action envelopes and their payloads.
//!
//!  - [`Name`] (and its aliases [`AccountName`], [`ActionName`], [`PermissionName`])
//!    is the 64-bit identifier used for accounts, actions and permissions
//!  - [`Bytes`] is an opaque blob of data, hex-encoded when represented in JSON
//!  - [`VarUint32`] is a `u32` that is serialized as a variable-length integer,
//!    used as the length prefix of all variable-length types

mod name;

use std::fmt;

use hex::FromHexError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub use name::{AccountName, ActionName, InvalidName, Name, PermissionName};


// -----------------------------------------------------------------------------
//     VarUint32
// -----------------------------------------------------------------------------

/// Newtype wrapper around a `u32` that has a different serialization implementation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct VarUint32(pub u32);

impl From<u32> for VarUint32 {
    fn from(n: u32) -> VarUint32 { VarUint32(n) }
}

impl From<VarUint32> for u32 {
    fn from(n: VarUint32) -> u32 { n.0 }
}

impl From<VarUint32> for usize {
    fn from(n: VarUint32) -> usize { n.0 as usize }
}

impl Serialize for VarUint32 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VarUint32 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(u32::deserialize(deserializer)?.into())
    }
}


// -----------------------------------------------------------------------------
//     Bytes
// -----------------------------------------------------------------------------

/// An opaque sequence of bytes.
///
/// Use this instead of `Vec<u8>` for binary fields: both have the same binary
/// encoding but `Bytes` is represented as a hex string in JSON.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new() -> Bytes {
        Bytes(vec![])
    }

    pub fn from_hex<T: AsRef<[u8]>>(data: T) -> Result<Bytes, FromHexError> {
        Ok(Bytes(hex::decode(data)?))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Bytes {
        Bytes(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(s: &[u8]) -> Bytes {
        Bytes(s.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(b: Bytes) -> Vec<u8> {
        b.0
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes({})", self.to_hex())
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        if serializer.is_human_readable() {
            self.to_hex().serialize(serializer)
        }
        else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

struct BytesVisitor;

impl<'de> de::Visitor<'de> for BytesVisitor {
    type Value = Bytes;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a hex string or a byte array")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Bytes, E> {
        Bytes::from_hex(v).map_err(E::custom)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Bytes, E> {
        Ok(Bytes::from(v))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Bytes, E> {
        Ok(Bytes(v))
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Bytes, A::Error> {
        let mut data = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(byte) = seq.next_element()? {
            data.push(byte);
        }
        Ok(Bytes(data))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // mirror `Serialize`: hex string for text formats, raw bytes otherwise
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(BytesVisitor)
        }
        else {
            deserializer.deserialize_byte_buf(BytesVisitor)
        }
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
    use super::*;

    #[test]
    fn bytes_json() -> Result<()> {
        let b = Bytes(vec![0xca, 0xfe]);
        assert_eq!(serde_json::to_string(&b)?, r#""cafe""#);
        assert_eq!(serde_json::from_str::<Bytes>(r#""cafe""#)?, b);
        assert!(serde_json::from_str::<Bytes>(r#""xyz""#).is_err());
        Ok(())
    }

    #[test]
    fn bytes_binary_format() -> Result<()> {
        let b = Bytes(vec![0xca, 0xfe]);

        // CBOR byte string of length 2
        let enc = serde_cbor::to_vec(&b)?;
        assert_eq!(enc, [0x42, 0xca, 0xfe]);

        let dec: Bytes = serde_cbor::from_slice(&enc)?;
        assert_eq!(dec, b);

        let empty: Bytes = serde_cbor::from_slice(&serde_cbor::to_vec(&Bytes::new())?)?;
        assert!(empty.is_empty());
        Ok(())
    }
}
