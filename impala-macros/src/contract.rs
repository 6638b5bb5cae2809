use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Error, Expr, ExprLit, ItemStruct, Lit, LitStr, MetaNameValue, Result, punctuated::Punctuated};

/// control whether we want to have debugging information for the macro when compiling
const DEBUG: bool = false;

macro_rules! debug {
    ( $($elem:expr),* ) => { if DEBUG { eprintln!( $($elem),* ); } }
}


pub type KVPairs = Punctuated<MetaNameValue, syn::Token![,]>;

/// Arguments of the `#[contract(account = "...", name = "...")]` attribute.
struct ContractArgs {
    account: LitStr,
    name: LitStr,
}

impl ContractArgs {
    fn parse(attrs: KVPairs) -> Result<ContractArgs> {
        let mut account = None;
        let mut name = None;

        for kv in attrs {
            let slot = if kv.path.is_ident("account") {
                &mut account
            } else if kv.path.is_ident("name") {
                &mut name
            } else {
                return Err(Error::new_spanned(&kv.path, "unknown argument, expected `account` or `name`"));
            };

            if slot.is_some() {
                return Err(Error::new_spanned(&kv, "argument given more than once"));
            }

            let Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) = &kv.value else {
                return Err(Error::new_spanned(&kv.value, "expected a string literal"));
            };
            *slot = Some(value.clone());
        }

        match (account, name) {
            (Some(account), Some(name)) => Ok(ContractArgs { account, name }),
            (None, _) => Err(Error::new(Span::call_site(), "missing `account` argument")),
            (_, None) => Err(Error::new(Span::call_site(), "missing `name` argument")),
        }
    }
}

pub fn expand(attrs: KVPairs, contract_struct: ItemStruct) -> TokenStream {
    match ContractArgs::parse(attrs) {
        Ok(args) => impl_contract(args, contract_struct),
        Err(error) => {
            let error = error.to_compile_error();
            quote! { #contract_struct #error }
        },
    }
}

fn impl_contract(args: ContractArgs, contract_struct: ItemStruct) -> TokenStream {
    let ContractArgs { account, name } = args;
    let ident = &contract_struct.ident;
    let (impl_generics, ty_generics, where_clause) = contract_struct.generics.split_for_impl();

    debug!("contract {} -> {}::{}", ident, account.value(), name.value());

    // invalid names fail const evaluation, hence compilation
    quote! {
        #contract_struct

        #[doc(hidden)]
        const _: () = {
            impl #impl_generics impala::Contract for #ident #ty_generics #where_clause {
                fn account() -> impala::AccountName {
                    const { impala::Name::constant(#account) }
                }
                fn name() -> impala::ActionName {
                    const { impala::Name::constant(#name) }
                }
            }
        };
    }
}
