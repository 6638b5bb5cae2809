use hex::FromHexError;
use snafu::{ensure, Snafu};
use tracing::trace;

use impala_macros::with_location;

#[with_location]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StreamError {
    #[snafu(display("truncated input, tried to read {wanted} byte(s) but only {available} available"))]
    TruncatedInput { wanted: usize, available: usize },

    #[snafu(display("varint does not fit in u32"))]
    InvalidVarInt,
}


/// A growable byte buffer with a read cursor.
///
/// Writes append to the end of the buffer and cannot fail. Reads consume bytes
/// from the cursor position and fail with [`StreamError::TruncatedInput`] when
/// the buffer ends too early, in which case the cursor is left untouched.
#[derive(Default, Clone)]
pub struct ByteStream {
    data: Vec<u8>,

    read_pos: usize,
}

impl From<ByteStream> for Vec<u8> {
    fn from(stream: ByteStream) -> Vec<u8> {
        stream.data
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(data: Vec<u8>) -> ByteStream {
        ByteStream { data, read_pos: 0 }
    }
}

impl From<&[u8]> for ByteStream {
    fn from(data: &[u8]) -> ByteStream {
        ByteStream { data: data.to_vec(), read_pos: 0 }
    }
}

impl ByteStream {
    pub fn new() -> Self {
        Self {
            data: vec![],
            read_pos: 0,
        }
    }

    pub fn from_hex<T: AsRef<[u8]>>(data: T) -> Result<Self, FromHexError> {
        Ok(Self::from(hex::decode(data)?))
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn hex_data(&self) -> String {
        hex::encode(&self.data)
    }

    /// Return the bytes that haven't been read yet.
    pub fn leftover(&self) -> &[u8] {
        &self.data[self.read_pos..]
    }

    pub fn read_byte(&mut self) -> Result<u8, StreamError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&[u8], StreamError> {
        let start = self.read_pos;
        let available = self.data.len() - start;
        ensure!(n <= available, TruncatedInputSnafu { wanted: n, available });

        self.read_pos += n;
        let bytes = &self.data[start..self.read_pos];
        trace!(n, hex = %hex::encode(bytes), "read bytes");
        Ok(bytes)
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.data.push(byte)
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes)
    }

    /// Write `n` as LEB128: 7 bits per byte, low bits first, high bit set on
    /// all bytes but the last one.
    pub fn write_var_u32(&mut self, mut n: u32) {
        while n >= 0x80 {
            self.write_byte(n as u8 | 0x80);
            n >>= 7;
        }
        self.write_byte(n as u8);
    }

    pub fn read_var_u32(&mut self) -> Result<u32, StreamError> {
        let mut value: u32 = 0;
        // a u32 needs at most 5 groups of 7 bits, the last one holding only 4 bits
        for shift in (0..35).step_by(7) {
            let byte = self.read_byte()?;
            ensure!(shift < 28 || byte <= 0x0f, InvalidVarIntSnafu);
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        InvalidVarIntSnafu.fail()
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
    fn read_past_end() -> Result<()> {
        let mut s = ByteStream::from_hex("0102")?;
        assert_eq!(s.read_byte()?, 1);

        let err = s.read_bytes(2).unwrap_err();
        assert!(matches!(err, StreamError::TruncatedInput { wanted: 2, available: 1, .. }));

        // a failed read doesn't consume anything
        assert_eq!(s.leftover(), &[2]);
        assert_eq!(s.read_bytes(1)?, &[2]);

        assert!(matches!(s.read_byte(), Err(StreamError::TruncatedInput { wanted: 1, available: 0, .. })));
        Ok(())
    }

    #[test]
    fn varuint32() -> Result<()> {
        let vals: [(u32, &str); 6] = [
            (0, "00"),
            (1, "01"),
            (127, "7f"),
            (128, "8001"),
            (624485, "e58e26"),
            (u32::MAX, "ffffffff0f"),
        ];

        for (n, repr) in vals {
            let mut s = ByteStream::new();
            s.write_var_u32(n);
            assert_eq!(s.hex_data(), repr);
            assert_eq!(s.read_var_u32()?, n);
            assert!(s.leftover().is_empty());
        }
        Ok(())
    }

    #[test]
    fn varuint32_too_long() -> Result<()> {
        // 6 bytes, or 5 bytes with bits set above the 32nd one
        for repr in ["ffffffffff01", "ffffffff7f", "ffffffff10", "8080808080"] {
            let mut s = ByteStream::from_hex(repr)?;
            assert!(matches!(s.read_var_u32(), Err(StreamError::InvalidVarInt { .. })),
                    "{repr} should not decode as a varuint32");
        }

        // largest value that fits
        let mut s = ByteStream::from_hex("ffffffff0f")?;
        assert_eq!(s.read_var_u32()?, u32::MAX);
        Ok(())
    }

    #[test]
    fn varuint32_truncated() -> Result<()> {
        let mut s = ByteStream::from_hex("ff")?;
        assert!(matches!(s.read_var_u32(), Err(StreamError::TruncatedInput { .. })));
        Ok(())
    }
}
