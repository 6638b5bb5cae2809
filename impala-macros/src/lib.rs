//! This crate contains macros to be used in the `impala` crate.
//!
//! You should not depend on it directly, all the macros are re-exported
//! from the `impala` crate itself.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemStruct};

#[cfg(feature = "detailed-error")]
use syn::ItemEnum;

mod contract;
mod serialize;

#[cfg(feature = "detailed-error")]
mod error;


/// Implement `impala::BinarySerializable` and `impala::Reflect` for a struct,
/// or `impala::BinarySerializable` for an enum whose variants are unit variants or
/// hold a single value.
#[proc_macro_derive(BinarySerializable)]
pub fn derive_binaryserializable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    serialize::derive(&input).into()
}

/// Bind a payload struct to the account and action name it is dispatched to.
#[proc_macro_attribute]
pub fn contract(attr: TokenStream, annotated_item: TokenStream) -> TokenStream {
    let attrs = parse_macro_input!(attr with contract::KVPairs::parse_terminated);
    let contract_struct = parse_macro_input!(annotated_item as ItemStruct);
    contract::expand(attrs, contract_struct).into()
}

/// Add a `location` field to all variants of a `Snafu` error enum
///
/// This will add the `location` field to all variants, which need to be either
/// structs or the unit type (tuple variants are not allowed).
/// The location field will be automatically populated when using the error selector.
///
/// It will also update the display string (if defined) to also show the location
/// that has been captured.
///
/// **NOTE:** you cannot use a `whatever` variant in conjunction with this, nor can you
///           manually define the `location` field yourself (it will conflict with the
///           generated one).
#[proc_macro_attribute]
pub fn with_location(attr: TokenStream, annotated_item: TokenStream) -> TokenStream {
    with_location_impl(attr, annotated_item)
}

#[cfg(feature = "detailed-error")]
fn with_location_impl(_attr: TokenStream, annotated_item: TokenStream) -> TokenStream {
    let error_enum = parse_macro_input!(annotated_item as ItemEnum);
    error::add_location_to_error_enum(error_enum).into()
}

#[cfg(not(feature = "detailed-error"))]
fn with_location_impl(_attr: TokenStream, annotated_item: TokenStream) -> TokenStream {
    annotated_item
}
