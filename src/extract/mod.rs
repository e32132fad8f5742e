//! Model extraction.
//!
//! Turns a parsed Rust file into [`Models`]: every top-level struct whose doc
//! comment carries a marker line (`/// +AR` by default) and whose fields all
//! have plain type names. Anything else is skipped without failing the run.

pub mod directive;
pub mod model;
pub mod tag;
pub mod visitor;

use std::path::Path;

use heck::ToSnakeCase;
use log::debug;
use syn::visit::Visit;

use crate::error::{ArgenError, ArgenResult};

pub use directive::{Directive, DirectiveKind};
pub use model::{Field, ModelDescriptor, Models};
pub use tag::FieldTag;
pub use visitor::ModelVisitor;

/// Collects the annotated models of `file`, in source order.
pub fn extract(file: &syn::File, package: &str, marker: &str) -> Models {
    let mut visitor = ModelVisitor::new(package, marker);
    visitor.visit_file(file);
    debug!(
        "Found {} model(s) in package `{package}`",
        visitor.models.len()
    );
    Models::from(visitor.models)
}

/// Parses `source` and extracts its models. `origin` names the source in
/// the error when it is not valid Rust.
pub fn extract_from_str(
    source: &str,
    origin: &str,
    package: &str,
    marker: &str,
) -> ArgenResult<Models> {
    let file = syn::parse_file(source).map_err(|source| ArgenError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    Ok(extract(&file, package, marker))
}

/// The module a source file defines: its stem in snake case, the parent
/// directory for `mod.rs`, and `crate` for crate roots.
pub fn package_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    match stem {
        "lib" | "main" => "crate".to_string(),
        "mod" => path
            .parent()
            .and_then(Path::file_name)
            .and_then(|s| s.to_str())
            .map(ToSnakeCase::to_snake_case)
            .unwrap_or_else(|| "crate".to_string()),
        stem => stem.to_snake_case(),
    }
}
