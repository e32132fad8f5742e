//! # argen
//!
//! Generates an ActiveRecord-style persistence layer from annotated Rust
//! structs.
//!
//! ## Overview
//!
//! A struct opts in with a marker line in its doc comment. Further marker
//! lines declare relations and scopes, and `#[ar(...)]` field tags carry the
//! primary key, column names and validation rules:
//!
//! ```rust,ignore
//! use argen_runtime::ActiveRecord;
//!
//! /// +AR
//! /// +AR has_many Posts
//! /// +AR scope Recent
//! #[derive(ActiveRecord, Debug, Default, Clone)]
//! pub struct User {
//!     #[ar(primary_key)]
//!     pub id: i64,
//!     #[ar(presence, length(maximum = 3))]
//!     pub name: String,
//! }
//! ```
//!
//! Running the generator over that file produces a sibling module with
//! `User::find`, `User::r#where(..).and(..).query()`, `User::recent(..)`,
//! `user.posts()`, `User::create(..)`, `user.save()`, `user.is_valid()` and
//! the rest. The generated code depends only on `argen_runtime`.
//!
//! ## Pipeline
//!
//! 1. [`extract`] reads annotated structs into [`Models`]
//! 2. [`synth`] expands the fragment library against them
//! 3. [`generate`] ties both to the file system for one [`GeneratorConfig`]

pub mod config;
pub mod error;
pub mod extract;
pub mod synth;

use std::fs;

use log::debug;

pub use config::GeneratorConfig;
pub use error::{ArgenError, ArgenResult, SynthError, SynthResult};
pub use extract::{Directive, DirectiveKind, Field, ModelDescriptor, Models, extract, extract_from_str};
pub use synth::{FragmentLibrary, Synthesizer};

/// Reads the input, extracts its models and writes the generated module.
///
/// Returns the extracted models. The output file is only touched once the
/// whole module has been synthesized.
pub fn generate(config: &GeneratorConfig) -> ArgenResult<Models> {
    let source = fs::read_to_string(&config.input).map_err(|source| ArgenError::Read {
        path: config.input.clone(),
        source,
    })?;
    let package = config.resolved_package();
    debug!(
        "Generating {} from {} (package `{package}`, marker `{}`)",
        config.output.display(),
        config.input.display(),
        config.marker
    );
    let origin = config.input.display().to_string();
    let models = extract_from_str(&source, &origin, &package, &config.marker)?;
    Synthesizer::standard().write_to_file(&models, &config.output)?;
    Ok(models)
}
