use std::path::PathBuf;

use thiserror::Error;

pub type ArgenResult<T> = Result<T, ArgenError>;

pub type SynthResult<T> = Result<T, SynthError>;

#[derive(Error, Debug)]
pub enum ArgenError {
    #[error("Failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse `{origin}`: {source}")]
    Parse {
        origin: String,
        #[source]
        source: syn::Error,
    },
    #[error(transparent)]
    Synthesis(#[from] SynthError),
}

/// Fatal generation errors. Any of these aborts the whole run.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Fragment `{fragment}` produced invalid Rust for model `{model}`: {source}")]
    MalformedFragment {
        fragment: String,
        model: String,
        #[source]
        source: syn::Error,
    },
    #[error("Fragment `{0}` is not part of the fragment library")]
    UnknownFragment(String),
    #[error("Fragment `{fragment}` needs a directive argument")]
    MissingArgument { fragment: String },
    #[error("Package `{0}` is not a valid module path")]
    InvalidPackage(String),
    #[error(
        "Model `{model}` has no primary key; tag a field with #[ar(primary_key)] or add an `id` field"
    )]
    MissingPrimaryKey { model: String },
    #[error("`{ident}` in model `{model}` is not a valid Rust identifier")]
    InvalidIdentifier { model: String, ident: String },
    #[error("Field `{field}` of model `{model}` has unusable type `{ty}`")]
    InvalidType {
        model: String,
        field: String,
        ty: String,
    },
    #[error("Model `{model}` would define method `{method}` more than once")]
    DuplicateMethod { model: String, method: String },
    #[error("Model `{model}` belongs to `{target}` but has no `{field}` field")]
    MissingForeignKey {
        model: String,
        target: String,
        field: String,
    },
}
