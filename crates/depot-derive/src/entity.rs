use crate::tag::field_tag;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, ext::IdentExt};

// derive_entity
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = if let Data::Struct(data) = &input.data {
        if let Fields::Named(named) = &data.fields {
            &named.named
        } else {
            let err = Error::new_spanned(
                &data.fields,
                "Entity can only be derived for structs with named fields",
            );
            return err.to_compile_error();
        }
    } else {
        let err = Error::new_spanned(
            &input.ident,
            "Entity can only be derived for structs with named fields",
        );
        return err.to_compile_error();
    };

    let mut tags = Vec::with_capacity(fields.len());
    let mut getters = Vec::with_capacity(fields.len());
    let mut setters = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let name = field_ident.unraw().to_string();
        let tag = match field_tag(&field.attrs) {
            Ok(Some(lit)) => lit.value(),
            Ok(None) => String::new(),
            Err(err) => return err.to_compile_error(),
        };

        tags.push(quote! {
            ::depot::reflect::FieldTag::new(#name, #tag)
        });
        getters.push(quote! {
            #index => Some(::depot::value::FieldValue::to_value(&self.#field_ident)),
        });
        setters.push(quote! {
            #index => {
                self.#field_ident = ::depot::value::FieldValue::from_value(value)?;
                Ok(())
            }
        });
    }

    quote! {
        impl #impl_generics ::depot::reflect::Reflect for #ident #ty_generics #where_clause {
            fn type_key(&self) -> ::std::any::TypeId {
                ::std::any::TypeId::of::<Self>()
            }

            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }

            fn field_tags(&self) -> Option<&'static [::depot::reflect::FieldTag]> {
                const TAGS: &[::depot::reflect::FieldTag] = &[#(#tags),*];

                Some(TAGS)
            }

            fn field_value(&self, index: usize) -> Option<::depot::value::Value> {
                match index {
                    #(#getters)*
                    _ => None,
                }
            }

            fn set_field_value(
                &mut self,
                index: usize,
                value: ::depot::value::Value,
            ) -> Result<(), ::depot::value::ValueTypeError> {
                match index {
                    #(#setters)*
                    _ => Err(::depot::value::ValueTypeError::new("field", &value)),
                }
            }
        }
    }
}
