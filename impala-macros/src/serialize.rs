use proc_macro2::{Span, TokenStream};
use quote::{quote, ToTokens};
use syn::{
    parse_quote, Data, DataEnum, DataStruct, DeriveInput, Error, Fields, FieldsNamed,
    GenericParam, Generics, Ident, Result, Type, Variant,
};


/// control whether we want to have debugging information for the macro when compiling
const DEBUG: bool = false;

macro_rules! debug {
    ( $($elem:expr),* ) => { if DEBUG { eprintln!( $($elem),* ); } }
}


// =============================================================================
//
//     `BinarySerializable`
//
// =============================================================================

pub fn derive(input: &DeriveInput) -> TokenStream {
    match try_expand(input) {
        Ok(expanded) => expanded,
        Err(error) => error.to_compile_error(),
    }
}

fn try_expand(input: &DeriveInput) -> Result<TokenStream> {
    match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => derive_binaryserializable_struct(input, fields),
        Data::Enum(enumeration) => derive_binaryserializable_enum(input, enumeration),
        _ => Err(Error::new(
            Span::call_site(),
            "currently only structs with named fields and enums are supported",
        )),
    }
}

fn add_trait_bounds(mut generics: Generics) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(impala::BinarySerializable));
        }
    }
    generics
}

/// Render a type the way it has been written in the struct definition, without
/// the spaces that `TokenStream::to_string()` inserts between tokens.
fn type_name(ty: &Type) -> String {
    ty.to_token_stream().to_string().replace(' ', "")
}

fn field_name(ident: &Ident) -> String {
    ident.to_string().trim_start_matches("r#").to_owned()
}

fn derive_binaryserializable_struct(input: &DeriveInput, fields: &FieldsNamed) -> Result<TokenStream> {
    let ident = &input.ident;
    let ident_str = ident.to_string();

    let fieldname = &fields.named.iter().map(|f| &f.ident).collect::<Vec<_>>();
    let fieldtype = &fields.named.iter().map(|f| &f.ty).collect::<Vec<_>>();

    // field identifiers are always present for named fields
    let fieldname_str: Vec<String> = fields.named.iter()
        .filter_map(|f| f.ident.as_ref())
        .map(field_name)
        .collect();
    let fieldtype_str: Vec<String> = fieldtype.iter().map(|t| type_name(t)).collect();

    debug!("field names: {:?}", &fieldname_str);
    debug!("field types: {:?}", &fieldtype_str);

    let generics = add_trait_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let (reflect_impl_generics, reflect_ty_generics, reflect_where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[doc(hidden)]
        const _: () = {
            impl #impl_generics impala::BinarySerializable for #ident #ty_generics #where_clause {
                fn to_bin(&self, s: &mut impala::ByteStream) {
                    #(
                        impala::BinarySerializable::to_bin(&self.#fieldname, s);
                    )*
                }
                fn from_bin(s: &mut impala::ByteStream) -> ::core::result::Result<Self, impala::SerializeError> {
                    Ok(Self {
                        #(
                            #fieldname: <#fieldtype as impala::BinarySerializable>::from_bin(s)?,
                        )*
                    })
                }
            }

            impl #reflect_impl_generics impala::Reflect for #ident #reflect_ty_generics #reflect_where_clause {
                const TYPE_NAME: &'static str = #ident_str;
                const FIELDS: &'static [impala::FieldDescriptor] = &[
                    #(
                        impala::FieldDescriptor { name: #fieldname_str, type_name: #fieldtype_str },
                    )*
                ];
            }
        };
    })
}

/// Variant payload kinds the enum derive knows how to encode.
enum Payload<'a> {
    Unit,
    Single(&'a Type),
}

fn variant_payload(variant: &Variant) -> Result<Payload<'_>> {
    match &variant.fields {
        Fields::Unit => Ok(Payload::Unit),
        Fields::Unnamed(f) if f.unnamed.len() == 1 => Ok(Payload::Single(&f.unnamed[0].ty)),
        _ => Err(Error::new_spanned(
            variant,
            "only unit variants and tuple variants holding a single value are supported",
        )),
    }
}

fn derive_binaryserializable_enum(input: &DeriveInput, enumeration: &DataEnum) -> Result<TokenStream> {
    if !input.generics.params.is_empty() || input.generics.where_clause.is_some() {
        return Err(Error::new_spanned(&input.generics, "generic enums are not supported"));
    }

    let ident = &input.ident;
    let ident_str = ident.to_string();

    let mut encode_arms = Vec::with_capacity(enumeration.variants.len());
    let mut decode_arms = Vec::with_capacity(enumeration.variants.len());

    for (index, variant) in enumeration.variants.iter().enumerate() {
        let tag = u32::try_from(index)
            .map_err(|_| Error::new_spanned(variant, "too many variants"))?;
        let var = &variant.ident;

        debug!("variant {tag}: {var}");

        match variant_payload(variant)? {
            Payload::Unit => {
                encode_arms.push(quote! {
                    #ident::#var => impala::BinarySerializable::to_bin(&impala::VarUint32(#tag), s),
                });
                decode_arms.push(quote! { #tag => #ident::#var, });
            },
            Payload::Single(ty) => {
                encode_arms.push(quote! {
                    #ident::#var(value) => {
                        impala::BinarySerializable::to_bin(&impala::VarUint32(#tag), s);
                        impala::BinarySerializable::to_bin(value, s);
                    },
                });
                decode_arms.push(quote! {
                    #tag => #ident::#var(<#ty as impala::BinarySerializable>::from_bin(s)?),
                });
            },
        }
    }

    Ok(quote! {
        #[doc(hidden)]
        const _: () = {
            impl impala::BinarySerializable for #ident {
                fn to_bin(&self, s: &mut impala::ByteStream) {
                    match self {
                        #( #encode_arms )*
                    }
                }
                fn from_bin(s: &mut impala::ByteStream) -> ::core::result::Result<Self, impala::SerializeError> {
                    let tag = <impala::VarUint32 as impala::BinarySerializable>::from_bin(s)?.0;
                    Ok(match tag {
                        #( #decode_arms )*
                        _ => return impala::binaryserializable::InvalidTagSnafu { tag, variant: #ident_str }.fail(),
                    })
                }
            }
        };
    })
}
