//! `#[derive(Bind)]` expansion.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::parse::{BindStruct, BoundField};

/// Expands the `Bind` derive for one struct.
pub fn expand_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let bind = BindStruct::parse(input)?;
    Ok(generate_impl(&bind))
}

fn generate_impl(bind: &BindStruct) -> TokenStream {
    let ident = &bind.ident;
    let krate = &bind.container.krate;
    let fields = bind.fields.iter().map(|field| generate_field(krate, field));

    quote! {
        #[automatically_derived]
        impl #krate::Bind for #ident {
            fn schema() -> #krate::StructSchema<Self> {
                #krate::SchemaBuilder::<Self>::new()
                    #(#fields)*
                    .build()
            }
        }
    }
}

fn generate_field(krate: &syn::Path, field: &BoundField) -> TokenStream {
    let ident = &field.ident;
    let name = &field.name;
    let path = field.attrs.path.as_ref().map(|key| quote!(.path(#key)));
    let query = field.attrs.query.as_ref().map(|key| quote!(.query(#key)));
    let json = field.attrs.json.as_ref().map(|key| quote!(.json(#key)));

    quote! {
        .field(
            #name,
            #krate::Annotations::new() #path #query #json,
            |dest| &mut dest.#ident,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_basic_struct() {
        let input = quote! {
            struct GetUser {
                #[bind(path = "id")]
                id: i64,
                #[bind(query = "verbose")]
                verbose: bool,
            }
        };

        let result = expand_derive(input);
        assert!(result.is_ok(), "expansion failed: {:?}", result.err());

        let expanded = result.unwrap().to_string();
        assert!(expanded.contains(":: reqbind :: Bind for GetUser"));
        assert!(expanded.contains(". path (\"id\")"));
        assert!(expanded.contains(". query (\"verbose\")"));
    }

    #[test]
    fn test_expand_keeps_all_annotations_in_order() {
        let input = quote! {
            struct Lookup {
                #[bind(json = "id", path = "id")]
                id: u32,
            }
        };

        let expanded = expand_derive(input).unwrap().to_string();
        let path_at = expanded.find(". path").unwrap();
        let json_at = expanded.find(". json").unwrap();
        assert!(path_at < json_at);
    }

    #[test]
    fn test_expand_with_crate_override() {
        let input = quote! {
            #[bind(crate = "reqbind_core")]
            struct Ping {
                #[bind(query = "n")]
                n: u8,
            }
        };

        let expanded = expand_derive(input).unwrap().to_string();
        assert!(expanded.contains("reqbind_core :: Bind for Ping"));
        assert!(!expanded.contains(":: reqbind ::"));
    }

    #[test]
    fn test_expand_empty_struct() {
        let input = quote! {
            struct Nothing {
                untagged: String,
            }
        };

        let expanded = expand_derive(input).unwrap().to_string();
        assert!(!expanded.contains(". field"));
        assert!(expanded.contains(". build ()"));
    }

    #[test]
    fn test_expand_enum_fails() {
        let input = quote! {
            enum NotAStruct { A }
        };
        assert!(expand_derive(input).is_err());
    }
}
