//! Code synthesis.
//!
//! Expands the [`FragmentLibrary`] against every extracted model and formats
//! the result as one Rust source file. The file is meant to be a sibling
//! module of the models, e.g. `models.rs` next to a generated `records.rs`.
//!
//! Generated code expects every model to implement `Default`, and every
//! field type to be `Clone + Default + PartialEq`, convertible into
//! [`argen_runtime::Value`] and readable through [`argen_runtime::FromValue`].

pub mod context;
pub mod fragments;
pub mod helpers;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use proc_macro2::TokenStream;
use quote::quote;

use crate::error::{ArgenError, ArgenResult, SynthError, SynthResult};
use crate::extract::{DirectiveKind, Models};

pub use context::{DirectiveContext, FieldContext, ModelContext};
pub use fragments::{Expansion, FragmentFn, FragmentLibrary};

pub const BANNER: &str = "// @generated by argen. Do not edit by hand.\n";

/// Fragments rendered for every model before its directives.
const LEADING: &[&str] = &[
    "Relation",
    "Select",
    "Find",
    "FindBy",
    "First",
    "Last",
    "Where",
    "And",
    "Order",
    "Limit",
    "Offset",
    "Group",
    "Having",
    "Explain",
    "Validation",
];

/// Fragments rendered for every model after its directives.
const TRAILING: &[&str] = &[
    "Build",
    "Create",
    "Save",
    "Update",
    "Delete",
    "Destroy",
    "Query",
    "QueryRow",
    "Exists",
    "FieldByName",
];

/// Fragments rendered once per directive, by kind.
fn directive_fragments(kind: DirectiveKind) -> &'static [&'static str] {
    match kind {
        DirectiveKind::HasMany => &["HasMany", "JoinsHasAny", "BuildHasAny"],
        DirectiveKind::HasOne => &["HasOne", "JoinsHasAny", "BuildHasAny"],
        DirectiveKind::BelongsTo => &["BelongsTo", "JoinsBelongsTo"],
        DirectiveKind::Scope => &["Scope"],
    }
}

pub struct Synthesizer<'l> {
    library: &'l FragmentLibrary,
}

impl Synthesizer<'static> {
    pub fn standard() -> Self {
        Self::new(FragmentLibrary::standard())
    }
}

impl Default for Synthesizer<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'l> Synthesizer<'l> {
    pub fn new(library: &'l FragmentLibrary) -> Self {
        Self { library }
    }

    /// Renders the whole file. Either every model expands or nothing is
    /// returned.
    pub fn synthesize(&self, models: &Models) -> SynthResult<String> {
        let mut file: syn::File = syn::parse2(header(models.package())?).map_err(|source| {
            SynthError::MalformedFragment {
                fragment: "Header".to_string(),
                model: String::new(),
                source,
            }
        })?;

        for descriptor in models {
            let model = ModelContext::new(descriptor)?;
            for &name in LEADING {
                file.items.extend(self.library.render(name, &model, None)?);
            }
            for directive in &model.directives {
                for &name in directive_fragments(directive.kind()) {
                    file.items
                        .extend(self.library.render(name, &model, Some(directive))?);
                }
            }
            for &name in TRAILING {
                file.items.extend(self.library.render(name, &model, None)?);
            }
            debug!(
                "Synthesized `{}` with {} directive(s)",
                model.name(),
                model.directives.len()
            );
        }

        Ok(format!("{BANNER}\n{}", prettyplease::unparse(&file)))
    }

    /// Synthesizes in memory, then writes the file in one go. Nothing is
    /// created when synthesis fails.
    pub fn write_to_file(&self, models: &Models, path: &Path) -> ArgenResult<()> {
        let source = self.synthesize(models)?;
        let write_err = |source: std::io::Error| ArgenError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(source.as_bytes()).map_err(write_err)?;
        writer.flush().map_err(write_err)?;
        debug!("Wrote {} byte(s) to {}", source.len(), path.display());
        Ok(())
    }
}

/// Lint allowances, the model import and the shared persistence handle.
fn header(package: &str) -> SynthResult<TokenStream> {
    let import = match package {
        "" | "crate" => quote!(use crate::*;),
        package => {
            let path = syn::parse_str::<syn::Path>(package)
                .map_err(|_| SynthError::InvalidPackage(package.to_string()))?;
            if path.segments.first().is_some_and(|s| s.ident == "crate") {
                quote!(use #path::*;)
            } else {
                quote!(use super::#path::*;)
            }
        }
    };
    Ok(quote! {
        #![allow(dead_code, unused, clippy::all)]

        #import

        static DB: ::argen_runtime::Handle = ::argen_runtime::Handle::new();

        /// Sets the connection every generated method uses. Only the first
        /// call succeeds.
        pub fn use_connection<C: ::argen_runtime::Connection + 'static>(
            conn: C,
        ) -> ::argen_runtime::RuntimeResult<()> {
            DB.set(conn)
        }
    })
}
