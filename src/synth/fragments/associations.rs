//! Fragments expanded once per directive.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::Expansion;
use crate::error::{SynthError, SynthResult};
use crate::synth::context::DirectiveContext;

fn target<'a>(e: &Expansion<'_, '_>, directive: &'a DirectiveContext) -> SynthResult<&'a syn::Ident> {
    directive.target.as_ref().ok_or_else(|| SynthError::MissingArgument {
        fragment: e.fragment.to_string(),
    })
}

pub(super) fn scope(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let directive = e.directive()?;
    let model = e.model;
    let (ident, relation, scopes) = (&model.ident, &model.relation, &model.scopes);
    let method = &directive.method;
    let name = directive.arg();
    let doc = format!(" Applies the `{name}` scope registered with [`{ident}::scope`].");
    Ok(quote! {
        impl #ident {
            #[doc = #doc]
            pub fn #method(
                args: &[::argen_runtime::Value],
            ) -> ::argen_runtime::RuntimeResult<#relation> {
                #scopes.apply(#name, Self::new_relation(), args)
            }
        }

        impl #relation {
            #[doc = #doc]
            pub fn #method(self, args: &[::argen_runtime::Value]) -> ::argen_runtime::RuntimeResult<Self> {
                #scopes.apply(#name, self, args)
            }
        }
    })
}

/// Loads `target` rows whose foreign key points at this record.
fn has_any(e: &Expansion<'_, '_>, many: bool) -> SynthResult<TokenStream> {
    let directive = e.directive()?;
    let target = target(e, directive)?;
    let model = e.model;
    let ident = &model.ident;
    let method = &directive.method;
    let foreign_key = &model.foreign_key;
    let pk = &model.primary_key().ident;
    let (output, terminal) = if many {
        (quote!(Vec<#target>), quote!(query))
    } else {
        (quote!(#target), quote!(first))
    };
    Ok(quote! {
        impl #ident {
            pub fn #method(&self) -> ::argen_runtime::RuntimeResult<#output> {
                #target::r#where(#foreign_key, vec![::argen_runtime::Value::from(self.#pk.clone())])
                    .#terminal()
            }
        }
    })
}

pub(super) fn has_many(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    has_any(e, true)
}

pub(super) fn has_one(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    has_any(e, false)
}

pub(super) fn belongs_to(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let directive = e.directive()?;
    let target = target(e, directive)?;
    let model = e.model;
    let ident = &model.ident;
    let method = &directive.method;
    let pk_column = &model.primary_key().column;
    let foreign_key = directive.foreign_key.as_ref().ok_or_else(|| SynthError::MissingArgument {
        fragment: e.fragment.to_string(),
    })?;
    Ok(quote! {
        impl #ident {
            pub fn #method(&self) -> ::argen_runtime::RuntimeResult<#target> {
                #target::r#where(#pk_column, vec![::argen_runtime::Value::from(self.#foreign_key.clone())])
                    .first()
            }
        }
    })
}

fn joins(e: &Expansion<'_, '_>, on: String) -> SynthResult<TokenStream> {
    let directive = e.directive()?;
    let target = target(e, directive)?.to_string();
    let relation = &e.model.relation;
    let method = directive.joins.as_ref().ok_or_else(|| SynthError::MissingArgument {
        fragment: e.fragment.to_string(),
    })?;
    Ok(quote! {
        impl #relation {
            pub fn #method(mut self) -> Self {
                self.statement = self.statement.join(#target, #on);
                self
            }
        }
    })
}

pub(super) fn joins_has_any(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let target = target(e, e.directive()?)?;
    let model = e.model;
    let on = format!(
        "{target}.{} = {}.{}",
        model.foreign_key,
        model.table,
        model.primary_key().column
    );
    joins(e, on)
}

pub(super) fn joins_belongs_to(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let directive = e.directive()?;
    let target = target(e, directive)?;
    let model = e.model;
    let foreign_key = model
        .fields
        .iter()
        .find(|f| directive.foreign_key.as_ref() == Some(&f.ident))
        .ok_or_else(|| SynthError::MissingArgument {
            fragment: e.fragment.to_string(),
        })?;
    let on = format!(
        "{target}.{} = {}.{}",
        model.primary_key().column,
        model.table,
        foreign_key.column
    );
    joins(e, on)
}

pub(super) fn build_has_any(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let directive = e.directive()?;
    let target = target(e, directive)?;
    let builder = directive.builder.as_ref().ok_or_else(|| SynthError::MissingArgument {
        fragment: e.fragment.to_string(),
    })?;
    let model = e.model;
    let ident = &model.ident;
    let params = format_ident!("{}Params", target);
    let foreign_key = &model.foreign_key_field;
    let pk = &model.primary_key().ident;
    let doc = format!(" Builds an unsaved `{target}` that belongs to this `{ident}`.");
    Ok(quote! {
        impl #ident {
            #[doc = #doc]
            pub fn #builder(&self, params: #params) -> #target {
                let mut record = #target::build(params);
                record.#foreign_key = self.#pk.clone();
                record
            }
        }
    })
}
