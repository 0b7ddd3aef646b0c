//! Record derive macro implementation

use heck::ToSnakeCase;
use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Result};

struct FieldAttrs {
    column: Option<String>,
    skip: bool,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let table = name.to_string().to_snake_case();

    let mut columns = Vec::new();
    let mut arms = Vec::new();
    for field in fields {
        let attrs = parse_field_attrs(field)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let column = attrs
            .column
            .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());
        let index = Literal::usize_unsuffixed(columns.len());

        arms.push(quote! {
            #index => {
                self.#ident = <#ty as ::condorm::FromValue>::from_value(value)
                    .map_err(|msg| ::condorm::OrmError::conversion(#column, msg))?;
                ::std::result::Result::Ok(())
            }
        });
        columns.push(column);
    }

    let type_name = name.to_string();

    Ok(quote! {
        impl #impl_generics ::condorm::Record for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
            const FIELDS: &'static [&'static str] = &[#(#columns),*];

            fn set_field(
                &mut self,
                index: usize,
                value: ::condorm::Value,
            ) -> ::condorm::OrmResult<()> {
                match index {
                    #(#arms)*
                    _ => ::std::result::Result::Err(::condorm::OrmError::invalid_argument(::std::format!(
                        "{} has no field #{}",
                        #type_name, index
                    ))),
                }
            }
        }
    })
}

fn parse_field_attrs(field: &Field) -> Result<FieldAttrs> {
    let mut attrs = FieldAttrs {
        column: None,
        skip: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.column = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported orm attribute, expected `column` or `skip`"))
            }
        })?;
    }
    Ok(attrs)
}
