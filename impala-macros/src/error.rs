use proc_macro2::{Group, TokenStream, TokenTree};
use quote::quote;
use syn::{
    parse2, parse_quote, Attribute, Field, Fields, FieldsNamed, ItemEnum, LitStr, Meta, Variant,
    visit_mut::{self, VisitMut},
};


fn location_fields() -> FieldsNamed {
    parse_quote!({ #[snafu(implicit)] location: snafu::Location })
}

fn location_field() -> Field {
    location_fields().named[0].clone()
}

/// Visitor adding a `location` field to each variant of an error enum and
/// appending that location to the `display` message of the variant.
struct AddLocation;

impl VisitMut for AddLocation {
    fn visit_variant_mut(&mut self, node: &mut Variant) {
        match &mut node.fields {
            Fields::Named(fields) => {
                if fields.named.iter().any(|f| f.ident.as_ref().is_some_and(|i| i == "location")) {
                    panic!("variant '{}' already defines a `location` field, please remove it so it can be added automatically",
                           &node.ident);
                }
                fields.named.push(location_field());
            },
            Fields::Unit => node.fields = Fields::Named(location_fields()),
            Fields::Unnamed(_) => {
                panic!("variant '{}' needs to be a struct or unit type to be able to add `location` to it!", &node.ident);
            },
        }

        visit_mut::visit_variant_mut(self, node);
    }

    fn visit_attribute_mut(&mut self, node: &mut Attribute) {
        if node.path().is_ident("snafu") {
            add_location_to_display(node);
        }
        visit_mut::visit_attribute_mut(self, node);
    }
}

fn display_with_location(group: TokenTree) -> TokenTree {
    let TokenTree::Group(group) = group else {
        panic!("expected the display message to be enclosed in parentheses");
    };

    let lit: LitStr = parse2(group.stream())
        .expect("display group needs to contain a string literal");
    let message = format!("{} (at: {{location}})", lit.value());
    let message = LitStr::new(&message, lit.span());

    TokenTree::Group(Group::new(group.delimiter(), quote! { #message }))
}

fn add_location_to_display(node: &mut Attribute) {
    let Meta::List(snafu_attrs) = &mut node.meta else {
        panic!("expected a list of arguments for the `snafu` attribute");
    };

    let mut tokens = snafu_attrs.tokens.clone().into_iter();
    let mut out: Vec<TokenTree> = vec![];

    while let Some(token) = tokens.next() {
        match token {
            TokenTree::Ident(ref i) if i == "display" => {
                out.push(token);
                if let Some(group) = tokens.next() {
                    out.push(display_with_location(group));
                }
            },
            TokenTree::Ident(ref i) if i == "whatever" => {
                panic!("`whatever` errors are incompatible with adding a `location` field");
            },
            _ => out.push(token),
        }
    }

    snafu_attrs.tokens = TokenStream::from_iter(out);
}

pub fn add_location_to_error_enum(mut error_enum: ItemEnum) -> TokenStream {
    AddLocation.visit_item_enum_mut(&mut error_enum);
    quote! { #error_enum }
}
