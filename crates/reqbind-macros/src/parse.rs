//! Parsing of `#[bind(...)]` attributes and the annotated struct.

use syn::{
    ext::IdentExt, punctuated::Punctuated, spanned::Spanned, Attribute, Data, DeriveInput, Expr,
    ExprLit, Fields, Ident, Lit, LitStr, Meta, Path, Token,
};

const IGNORE: &str = "-";

/// Source keys written on one field.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldAttrs {
    /// Path parameter key.
    pub path: Option<String>,
    /// Query parameter key.
    pub query: Option<String>,
    /// JSON body key.
    pub json: Option<String>,
}

impl FieldAttrs {
    /// Collects every `#[bind(...)]` attribute on a field.
    ///
    /// Returns `None` when the field carries no `bind` attribute at all.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Option<Self>> {
        let mut parsed = None;

        for attr in attrs.iter().filter(|a| a.path().is_ident("bind")) {
            let field_attrs: &mut Self = parsed.get_or_insert_with(Self::default);
            for (ident, value) in name_values(attr)? {
                let slot = match ident.to_string().as_str() {
                    "path" => &mut field_attrs.path,
                    "query" => &mut field_attrs.query,
                    "json" => &mut field_attrs.json,
                    other => {
                        return Err(syn::Error::new(
                            ident.span(),
                            format!("unknown bind source: {other} (expected path, query or json)"),
                        ))
                    }
                };
                if slot.is_some() {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("duplicate bind source: {ident}"),
                    ));
                }
                *slot = Some(value.value());
            }
        }

        Ok(parsed)
    }

    /// Returns true if at least one source key is usable.
    pub fn binds_anything(&self) -> bool {
        [&self.path, &self.query, &self.json]
            .into_iter()
            .flatten()
            .any(|key| !key.is_empty() && key != IGNORE)
    }
}

/// Container-level options.
#[derive(Debug)]
pub struct ContainerAttrs {
    /// Path of the crate that defines `Bind`.
    pub krate: Path,
}

impl ContainerAttrs {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut krate = None;

        for attr in attrs.iter().filter(|a| a.path().is_ident("bind")) {
            for (ident, value) in name_values(attr)? {
                if ident != "crate" {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown container attribute: {ident}"),
                    ));
                }
                krate = Some(value.parse::<Path>()?);
            }
        }

        Ok(Self {
            krate: krate.unwrap_or_else(|| syn::parse_quote!(::reqbind)),
        })
    }
}

/// A field that takes part in binding.
#[derive(Debug)]
pub struct BoundField {
    /// The field identifier.
    pub ident: Ident,
    /// The identifier as reported at runtime, without any `r#` prefix.
    pub name: String,
    /// Source keys.
    pub attrs: FieldAttrs,
}

/// A struct deriving `Bind`.
#[derive(Debug)]
pub struct BindStruct {
    /// The struct name.
    pub ident: Ident,
    /// Container options.
    pub container: ContainerAttrs,
    /// Bound fields in declaration order.
    pub fields: Vec<BoundField>,
}

impl BindStruct {
    /// Validates the derive input and collects the bound fields.
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new(
                input.generics.span(),
                "Bind cannot be derived for generic types",
            ));
        }

        let named = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => &named.named,
                _ => {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "Bind can only be derived for structs with named fields",
                    ))
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "Bind destinations must be structs, not enums",
                ))
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "Bind destinations must be structs, not unions",
                ))
            }
        };

        let container = ContainerAttrs::from_attrs(&input.attrs)?;

        let mut fields = Vec::new();
        for field in named {
            let Some(attrs) = FieldAttrs::from_attrs(&field.attrs)? else {
                continue;
            };
            if !attrs.binds_anything() {
                continue;
            }
            let Some(ident) = field.ident.clone() else {
                continue;
            };
            fields.push(BoundField {
                name: ident.unraw().to_string(),
                ident,
                attrs,
            });
        }

        Ok(Self {
            ident: input.ident,
            container,
            fields,
        })
    }
}

fn name_values(attr: &Attribute) -> syn::Result<Vec<(Ident, LitStr)>> {
    let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;

    metas
        .into_iter()
        .map(|meta| match meta {
            Meta::NameValue(nv) => {
                let ident = nv
                    .path
                    .get_ident()
                    .ok_or_else(|| syn::Error::new(nv.path.span(), "expected identifier"))?
                    .clone();
                match nv.value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) => Ok((ident, s)),
                    other => Err(syn::Error::new(other.span(), "expected string literal")),
                }
            }
            other => Err(syn::Error::new(other.span(), "expected name = \"value\"")),
        })
        .collect()
}
