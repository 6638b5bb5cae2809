//! Binary encoding of values, the way they are packed in action data and
//! in the action envelopes themselves.
//!
//! The encoding is purely positional: a struct is the concatenation of its
//! fields in declaration order, with no tags, padding or type markers, so both
//! ends need to agree on the schema beforehand.
//!
//! | type                          | encoding                                         |
//! |-------------------------------|--------------------------------------------------|
//! | `bool`                        | 1 byte, `0` or `1`                               |
//! | ints, floats                  | little-endian, fixed width                       |
//! | [`Name`]                      | its `u64` value                                  |
//! | `[u8; N]`                     | the `N` raw bytes                                |
//! | [`VarUint32`]                 | LEB128, 1 to 5 bytes                             |
//! | [`Bytes`], `String`           | `VarUint32` length, then raw bytes               |
//! | `Vec<T>`                      | `VarUint32` count, then each element in order    |
//! | `Option<T>`                   | `bool` presence flag, then the value if present  |
//! | structs                       | fields in declaration order                      |
//! | enums                         | `VarUint32` variant index, then the variant data |

use std::mem::size_of;
use std::str::{from_utf8, Utf8Error};

use bytemuck::{bytes_of, pod_read_unaligned};
use hex::FromHexError;
use snafu::{ensure, IntoError, ResultExt, Snafu};

use impala_macros::with_location;

use crate::{
    ByteStream, StreamError, Bytes, Name, VarUint32,
    impl_auto_error_conversion,
};


#[with_location]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SerializeError {
    #[snafu(display("stream error"))]
    StreamError { source: StreamError },

    #[snafu(display("cannot decode bytes as utf-8"))]
    Utf8Error { source: Utf8Error },

    #[snafu(display("cannot decode hex data"))]
    HexDecode { source: FromHexError },

    #[snafu(display("invalid tag {tag} for variant type {variant}"))]
    InvalidTag { tag: u32, variant: String },

    #[snafu(display("trailing data, {leftover} byte(s) haven't been consumed"))]
    TrailingData { leftover: usize },

    #[snafu(display("{msg}"))]
    InvalidData { msg: String },  // acts as a generic error type with a given message
}

impl_auto_error_conversion!(SerializeError {
    StreamError => StreamSnafu,
    FromHexError => HexDecodeSnafu,
});

impl SerializeError {
    /// Return whether this error comes from the input ending before the
    /// value could be fully decoded.
    pub fn is_truncated_input(&self) -> bool {
        matches!(self, SerializeError::StreamError { source: StreamError::TruncatedInput { .. }, .. })
    }
}


/// Define methods required to (de)serialize a value to a [`ByteStream`]
///
/// You usually want to derive this trait using the [`BinarySerializable`](macro@crate::BinarySerializable)
/// derive macro, which encodes all fields sequentially in their order of declaration.
pub trait BinarySerializable {
    fn to_bin(&self, stream: &mut ByteStream);
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError>
    where
        Self: Sized;
}


// -----------------------------------------------------------------------------
//     Convenience functions
// -----------------------------------------------------------------------------

/// Pack the given value into its binary representation.
pub fn to_bin<T: BinarySerializable>(value: &T) -> Bytes {
    let mut s = ByteStream::new();
    value.to_bin(&mut s);
    Bytes(s.into_bytes())
}

/// Pack the given value into the hex representation of its binary encoding.
pub fn to_hex<T: BinarySerializable>(value: &T) -> String {
    let mut s = ByteStream::new();
    value.to_bin(&mut s);
    s.hex_data()
}

/// Unpack a value from its binary representation.
///
/// Bytes remaining after the value has been decoded are ignored, use
/// [`from_bin_exact`] to reject them.
pub fn from_bin<T: BinarySerializable>(bin: impl AsRef<[u8]>) -> Result<T, SerializeError> {
    let mut s = ByteStream::from(bin.as_ref());
    T::from_bin(&mut s)
}

/// Unpack a value from its binary representation, failing if the given data
/// contains more bytes than needed to decode it.
pub fn from_bin_exact<T: BinarySerializable>(bin: impl AsRef<[u8]>) -> Result<T, SerializeError> {
    let mut s = ByteStream::from(bin.as_ref());
    let result = T::from_bin(&mut s)?;
    let leftover = s.leftover().len();
    ensure!(leftover == 0, TrailingDataSnafu { leftover });
    Ok(result)
}

/// Unpack a value from the hex representation of its binary encoding.
/// Trailing data is an error.
pub fn from_hex<T: BinarySerializable>(hex_repr: impl AsRef<[u8]>) -> Result<T, SerializeError> {
    from_bin_exact(hex::decode(hex_repr)?)
}


// -----------------------------------------------------------------------------
//     Serialization of ints and native Rust types
// -----------------------------------------------------------------------------

macro_rules! impl_pod_serialization {
    ($($typ:ty),+) => {
        $(
            impl BinarySerializable for $typ {
                #[inline]
                fn to_bin(&self, stream: &mut ByteStream) {
                    stream.write_bytes(bytes_of(self))
                }
                #[inline]
                fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
                    Ok(pod_read_unaligned(stream.read_bytes(size_of::<$typ>())?))
                }
            }
        )+
    }
}

impl_pod_serialization!(i16, i32, i64, i128);
impl_pod_serialization!(u16, u32, u64, u128);
impl_pod_serialization!(f32, f64);

impl BinarySerializable for bool {
    #[inline]
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_byte(*self as u8)
    }
    #[inline]
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        match stream.read_byte()? {
            1 => Ok(true),
            0 => Ok(false),
            b => InvalidDataSnafu { msg: format!("cannot parse bool from byte {b:#04x}") }.fail(),
        }
    }
}

impl BinarySerializable for i8 {
    #[inline]
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_byte(*self as u8)
    }
    #[inline]
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(stream.read_byte()? as i8)
    }
}

impl BinarySerializable for u8 {
    #[inline]
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_byte(*self)
    }
    #[inline]
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(stream.read_byte()?)
    }
}

impl<const N: usize> BinarySerializable for [u8; N] {
    #[inline]
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_bytes(&self[..])
    }
    #[inline]
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let mut result = [0u8; N];
        result.copy_from_slice(stream.read_bytes(N)?);
        Ok(result)
    }
}

impl BinarySerializable for VarUint32 {
    #[inline]
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_var_u32(self.0)
    }
    #[inline]
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(stream.read_var_u32()?.into())
    }
}


// -----------------------------------------------------------------------------
//     Serialization of string types
// -----------------------------------------------------------------------------

fn write_len(stream: &mut ByteStream, len: usize) {
    let len = u32::try_from(len).expect("length prefixes are limited to u32::MAX by the wire format");
    stream.write_var_u32(len)
}

fn write_blob(stream: &mut ByteStream, blob: &[u8]) {
    write_len(stream, blob.len());
    stream.write_bytes(blob);
}

impl BinarySerializable for Bytes {
    fn to_bin(&self, stream: &mut ByteStream) {
        write_blob(stream, &self.0)
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = stream.read_var_u32()? as usize;
        Ok(Bytes::from(stream.read_bytes(len)?))
    }
}

impl BinarySerializable for String {
    fn to_bin(&self, stream: &mut ByteStream) {
        write_blob(stream, self.as_bytes())
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = stream.read_var_u32()? as usize;
        from_utf8(stream.read_bytes(len)?).context(Utf8Snafu).map(|s| s.to_owned())
    }
}


// -----------------------------------------------------------------------------
//     Serialization of Antelope types
// -----------------------------------------------------------------------------

impl BinarySerializable for Name {
    #[inline]
    fn to_bin(&self, stream: &mut ByteStream) {
        self.as_u64().to_bin(stream)
    }

    #[inline]
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(Name::from_u64(u64::from_bin(stream)?))
    }
}


// -----------------------------------------------------------------------------
//     blanket implementations for containers
// -----------------------------------------------------------------------------

impl<T: BinarySerializable> BinarySerializable for Vec<T> {
    fn to_bin(&self, stream: &mut ByteStream) {
        write_len(stream, self.len());
        for elem in self {
            elem.to_bin(stream);
        }
    }

    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = stream.read_var_u32()? as usize;
        // don't trust the announced length for preallocating, it comes from the input
        let mut result = Vec::with_capacity(len.min(stream.leftover().len()));
        for _ in 0..len {
            result.push(T::from_bin(stream)?);
        }
        Ok(result)
    }
}

impl<T: BinarySerializable> BinarySerializable for Option<T> {
    fn to_bin(&self, stream: &mut ByteStream) {
        match self {
            Some(v) => {
                true.to_bin(stream);
                v.to_bin(stream);
            },
            None => false.to_bin(stream),
        }
    }

    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(match bool::from_bin(stream)? {
            true => Some(T::from_bin(stream)?),
            false => None,
        })
    }
}

impl<T: BinarySerializable> BinarySerializable for Box<T> {
    fn to_bin(&self, stream: &mut ByteStream) {
        (**self).to_bin(stream)
    }

    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(Box::new(T::from_bin(stream)?))
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================
