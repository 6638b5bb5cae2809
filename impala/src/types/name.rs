use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, Snafu};

use impala_macros::with_location;


#[with_location]
#[derive(Debug, Snafu)]
pub enum InvalidName {
    #[snafu(display(r#"name "{name}" has more than 13 characters"#))]
    TooLong { name: String },

    #[snafu(display(r#"name "{given}" is not in normal form, it would read as "{normalized}""#))]
    InvalidNormalization {
        given: String,
        normalized: String,
    },
}

/// An immutable name, used for accounts, actions and permissions, encoded as a `u64`.
///
/// Names are made of up to 13 characters out of `.12345abcdefghijklmnopqrstuvwxyz`,
/// 5 bits per char for the first 12 ones and 4 bits for the last one. On the wire
/// they are the 8 little-endian bytes of that `u64`.
#[derive(Eq, Hash, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Default)]
pub struct Name {
    value: u64,
}

pub type AccountName = Name;
pub type ActionName = Name;
pub type PermissionName = Name;

impl Name {
    /// Build a `Name` from its string representation.
    ///
    /// ## Example
    /// ```
    /// # use impala::{Name, InvalidName};
    /// assert!(Name::new("alice").is_ok());
    /// assert_eq!(Name::new("eosio.token")?.to_string(), "eosio.token");
    /// assert_eq!(Name::new("")?.as_u64(), 0);
    /// assert!(Name::new("Alice").is_err());
    /// # Ok::<(), InvalidName>(())
    /// ```
    pub fn new(s: &str) -> Result<Self, InvalidName> {
        ensure!(s.len() <= 13, TooLongSnafu { name: s });

        let result = Name { value: pack(s.as_bytes()) };
        ensure!(is_normalized(s.as_bytes(), result.value),
                InvalidNormalizationSnafu { given: s, normalized: result.to_string() });

        Ok(result)
    }

    /// Build a `Name` in a `const` context, panicking (at compile time when
    /// used in a `const` block) if the given string is not a valid name.
    pub const fn constant(s: &str) -> Self {
        if s.len() > 13 { panic!("name has more than 13 characters"); }
        let value = pack(s.as_bytes());
        if !is_normalized(s.as_bytes(), value) { panic!("name is not in normal form"); }
        Name { value }
    }

    /// Build a `Name` from its `u64` representation.
    #[inline]
    pub const fn from_u64(n: u64) -> Self {
        // all u64 are valid names
        Self { value: n }
    }

    /// Return the name `u64` representation.
    #[inline]
    pub const fn as_u64(&self) -> u64 { self.value }
}


// -----------------------------------------------------------------------------
//     Helper functions
// -----------------------------------------------------------------------------

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

const fn char_to_symbol(c: u8) -> u64 {
    match c {
        b'a'..=b'z' => (c - b'a') as u64 + 6,
        b'1'..=b'5' => (c - b'1') as u64 + 1,
        _ => 0,
    }
}

/// Encode the given chars into a name value. Invalid chars are encoded as `.`,
/// which is later caught by the normalization check.
const fn pack(s: &[u8]) -> u64 {
    let mut n: u64 = 0;
    let mut i = 0;
    while i < s.len() && i < 12 {
        n |= char_to_symbol(s[i]) << (64 - 5 * (i + 1));
        i += 1;
    }

    // the 13th char only has the 4 remaining low bits available
    if s.len() >= 13 {
        n |= char_to_symbol(s[12]) & 0x0F;
    }

    n
}

/// Expand a name value into its 13 chars, along with the length of the
/// name once its trailing dots have been removed.
const fn expand(value: u64) -> ([u8; 13], usize) {
    let mut chars = [b'.'; 13];
    let mut n = value;
    let mut i = 0;
    while i < 13 {
        let (mask, shift) = if i == 0 { (0x0F, 4) } else { (0x1F, 5) };
        chars[12 - i] = CHARMAP[(n & mask) as usize];
        n >>= shift;
        i += 1;
    }

    let mut len = 13;
    while len > 0 && chars[len - 1] == b'.' {
        len -= 1;
    }
    (chars, len)
}

const fn is_normalized(s: &[u8], value: u64) -> bool {
    let (chars, len) = expand(value);
    if s.len() != len { return false; }

    let mut i = 0;
    while i < len {
        if s[i] != chars[i] { return false; }
        i += 1;
    }
    true
}


// -----------------------------------------------------------------------------
//     Conversion traits
// -----------------------------------------------------------------------------

impl TryFrom<&str> for Name {
    type Error = InvalidName;

    fn try_from(s: &str) -> Result<Name, InvalidName> {
        Name::new(s)
    }
}

impl From<u64> for Name {
    fn from(n: u64) -> Name {
        Name::from_u64(n)
    }
}

impl From<Name> for u64 {
    fn from(n: Name) -> u64 {
        n.value
    }
}

impl FromStr for Name {
    type Err = InvalidName;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::new(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (chars, len) = expand(self.value);
        // CHARMAP only contains ASCII chars
        let s = std::str::from_utf8(&chars[..len]).map_err(|_| fmt::Error)?;
        f.write_str(s)
    }
}


// -----------------------------------------------------------------------------
//     `Serde` traits implementation
// -----------------------------------------------------------------------------

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Name, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Name::new(&name).map_err(de::Error::custom)
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
    fn known_values() -> Result<()> {
        let vals = [
            ("",            0_u64),
            ("foobar",      6712742083569909760),
            ("eosio",       6138663577826885632),
            ("eosio.token", 6138663591592764928),
            ("active",      3617214756542218240),
            ("transfer",    14829575313431724032),
        ];

        for (s, n) in vals {
            let name = Name::new(s)?;
            assert_eq!(name.as_u64(), n, "wrong encoding for name \"{s}\"");
            assert_eq!(name.to_string(), s);
            assert_eq!(Name::from_u64(n), name);
        }
        Ok(())
    }

    #[test]
    fn invalid_names() {
        for n in [
            "fourteenchars1",  // 14 chars
            "Alice",           // upper case
            "bob!",            // punctuation
            "carol.",          // trailing dot
            "zoé",             // non-ascii
            ".",
            "6",               // only digits 1 to 5
            "aaaaaaaaaaaak",   // 13th char is limited to [.1-5a-j]
        ] {
            let err = Name::new(n).unwrap_err();
            assert!(matches!(err, InvalidName::TooLong { .. } | InvalidName::InvalidNormalization { .. }),
                    "unexpected error for \"{n}\": {err:?}");
        }
    }

    #[test]
    fn thirteen_chars() -> Result<()> {
        let name = Name::new("aaaaaaaaaaaaj")?;
        assert_eq!(name.to_string(), "aaaaaaaaaaaaj");
        Ok(())
    }

    #[test]
    fn const_names() {
        const EOSIO: Name = Name::constant("eosio");
        assert_eq!(EOSIO, Name::from_u64(6138663577826885632));
    }

    #[test]
    fn json() -> Result<()> {
        let name = Name::new("eosio.token")?;
        let json = r#""eosio.token""#;

        assert_eq!(serde_json::to_string(&name)?, json);
        assert_eq!(serde_json::from_str::<Name>(json)?, name);
        assert!(serde_json::from_str::<Name>(r#""NOPE""#).is_err());
        Ok(())
    }
}
