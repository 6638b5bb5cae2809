//! Field-reflection descriptors for structs.
//!
//! A descriptor is the ordered list of the fields of a struct, along with
//! their types, as they have been declared. It is generated at compile time
//! by the [`BinarySerializable`](macro@crate::BinarySerializable) derive macro,
//! and that list is the same one the derived encoder and decoder walk through,
//! so the descriptor always matches the binary layout of the struct.

use std::fmt;

use serde::Serialize;


/// Name and type of a single field of a struct.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub type_name: &'static str,
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_name)
    }
}

/// Expose the ordered list of fields of a struct.
///
/// # Example
///
/// ```
/// # use impala::{BinarySerializable, FieldDescriptor, Reflect, Name};
/// #[derive(BinarySerializable)]
/// struct Greeting {
///     to: Name,
///     message: String,
/// }
///
/// assert_eq!(Greeting::TYPE_NAME, "Greeting");
/// assert_eq!(Greeting::field_names().collect::<Vec<_>>(), ["to", "message"]);
/// assert_eq!(Greeting::FIELDS[0], FieldDescriptor { name: "to", type_name: "Name" });
/// ```
pub trait Reflect {
    const TYPE_NAME: &'static str;
    const FIELDS: &'static [FieldDescriptor];

    fn field_names() -> impl Iterator<Item = &'static str> {
        Self::FIELDS.iter().map(|f| f.name)
    }

    /// Return a JSON object describing the struct, suitable for display.
    fn describe() -> serde_json::Value {
        serde_json::json!({
            "name": Self::TYPE_NAME,
            "fields": Self::FIELDS,
        })
    }
}
