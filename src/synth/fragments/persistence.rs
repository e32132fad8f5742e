//! Write-side fragments: params, create, save, update, delete.

use proc_macro2::TokenStream;
use quote::quote;

use super::Expansion;
use crate::error::SynthResult;
use crate::synth::helpers::join_field;

pub(super) fn build(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let model = e.model;
    let (ident, params) = (&model.ident, &model.params);
    let fields: Vec<_> = model.fields.iter().map(|f| &f.ident).collect();
    let types = model.fields.iter().map(|f| &f.ty);
    let doc = format!(" Attributes accepted by [`{ident}::build`] and [`{ident}::create`].");
    Ok(quote! {
        #[doc = #doc]
        #[derive(Clone, Default)]
        pub struct #params {
            #(pub #fields: #types,)*
        }

        impl #ident {
            /// A new, unsaved record.
            pub fn build(params: #params) -> Self {
                Self {
                    #(#fields: params.#fields,)*
                }
            }
        }
    })
}

pub(super) fn create(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let model = e.model;
    let (ident, params) = (&model.ident, &model.params);
    let doc = format!(
        " Builds a record from `{}` and saves it.",
        join_field(&model.descriptor.field_names("params."))
    );
    Ok(quote! {
        impl #ident {
            #[doc = #doc]
            pub fn create(params: #params) -> Result<Self, ::argen_runtime::Errors> {
                let mut record = Self::build(params);
                record.save()?;
                Ok(record)
            }
        }
    })
}

pub(super) fn save(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let model = e.model;
    let ident = &model.ident;
    let pk = model.primary_key();
    let (pk_field, pk_ty, pk_column) = (&pk.ident, &pk.ty, &pk.column);
    let columns: Vec<TokenStream> = model
        .attributes()
        .map(|f| {
            let (column, field) = (&f.column, &f.ident);
            quote!(.param(#column, self.#field.clone()))
        })
        .collect();
    Ok(quote! {
        impl #ident {
            pub fn is_new_record(&self) -> bool {
                ::argen_runtime::is_zero(&self.#pk_field)
            }

            pub fn is_persistent(&self) -> bool {
                !self.is_new_record()
            }

            /// Validates, then inserts a new record or updates a persistent
            /// one. Storage failures are reported under `base`.
            pub fn save(&mut self) -> Result<(), ::argen_runtime::Errors> {
                let (valid, errors) = self.is_valid();
                if !valid {
                    return Err(errors);
                }
                self.persist().map_err(|err| {
                    let mut errors = ::argen_runtime::Errors::new();
                    errors.add("base", err.to_string());
                    errors
                })
            }

            fn persist(&mut self) -> ::argen_runtime::RuntimeResult<()> {
                if self.is_new_record() {
                    let (sql, params) = ::argen_runtime::query::Insert::new(Self::TABLE)
                        #(#columns)*
                        .build();
                    let result = DB.execute(&sql, &params)?;
                    if let Some(id) = result.last_insert_id {
                        self.#pk_field = <#pk_ty as ::argen_runtime::FromValue>::from_value(
                            &::argen_runtime::Value::Int(id),
                        )?;
                    }
                } else {
                    let (sql, params) = ::argen_runtime::query::Update::new(Self::TABLE)
                        #(#columns)*
                        .r#where(#pk_column, vec![::argen_runtime::Value::from(self.#pk_field.clone())])
                        .build();
                    DB.execute(&sql, &params)?;
                }
                Ok(())
            }
        }
    })
}

pub(super) fn update(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let model = e.model;
    let (ident, params) = (&model.ident, &model.params);
    let assignments = model.attributes().map(|f| {
        let field = &f.ident;
        quote! {
            if !::argen_runtime::is_zero(&params.#field) {
                self.#field = params.#field;
            }
        }
    });
    Ok(quote! {
        impl #ident {
            /// Copies every non-default attribute of `params`, then saves.
            /// The primary key is never changed.
            pub fn update(&mut self, params: #params) -> Result<(), ::argen_runtime::Errors> {
                #(#assignments)*
                self.save()
            }
        }
    })
}

pub(super) fn delete(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let model = e.model;
    let ident = &model.ident;
    let pk = model.primary_key();
    let (pk_field, pk_column) = (&pk.ident, &pk.column);
    Ok(quote! {
        impl #ident {
            pub fn delete(&self) -> ::argen_runtime::RuntimeResult<()> {
                let (sql, params) = ::argen_runtime::query::Delete::new(Self::TABLE)
                    .r#where(#pk_column, vec![::argen_runtime::Value::from(self.#pk_field.clone())])
                    .build();
                DB.execute(&sql, &params)?;
                Ok(())
            }

            /// Deletes every row of the table and returns how many went.
            pub fn delete_all() -> ::argen_runtime::RuntimeResult<u64> {
                let (sql, params) = ::argen_runtime::query::Delete::new(Self::TABLE).build();
                Ok(DB.execute(&sql, &params)?.rows_affected)
            }
        }
    })
}

pub(super) fn destroy(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let model = e.model;
    let ident = &model.ident;
    let pk_field = &model.primary_key().ident;
    Ok(quote! {
        impl #ident {
            /// Deletes the record and hands it back as a new record.
            pub fn destroy(mut self) -> ::argen_runtime::RuntimeResult<Self> {
                self.delete()?;
                self.#pk_field = Default::default();
                Ok(self)
            }
        }
    })
}

pub(super) fn field_by_name(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let model = e.model;
    let ident = &model.ident;
    let arms = model.fields.iter().map(|f| {
        let (key, field) = (&f.key, &f.ident);
        quote!(#key => Some(::argen_runtime::Value::from(self.#field.clone())),)
    });
    Ok(quote! {
        impl #ident {
            pub fn field_by_name(&self, name: &str) -> Option<::argen_runtime::Value> {
                match name {
                    #(#arms)*
                    _ => None,
                }
            }
        }
    })
}
