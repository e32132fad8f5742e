//! Generator configuration, built with `typed-builder`.

use std::path::PathBuf;

use typed_builder::TypedBuilder;

use crate::extract::package_from_path;

pub const DEFAULT_OUTPUT: &str = "records.rs";
pub const DEFAULT_MARKER: &str = "+AR";
/// Environment variable naming the input file when none is given.
pub const INPUT_ENV: &str = "ARGEN_FILE";

/// One generator run: where models come from and where code goes.
///
/// # Examples
///
/// ```
/// use argen::config::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .input("src/models.rs")
///     .output("src/records.rs")
///     .build();
/// assert_eq!(config.marker, "+AR");
/// assert_eq!(config.resolved_package(), "models");
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct GeneratorConfig {
    /// Rust source file holding the annotated structs
    #[builder(setter(into))]
    pub input: PathBuf,

    /// File the generated module is written to
    #[builder(default = PathBuf::from(DEFAULT_OUTPUT), setter(into))]
    pub output: PathBuf,

    /// Doc comment prefix that opts a struct into generation
    #[builder(default = DEFAULT_MARKER.to_string(), setter(into))]
    pub marker: String,

    /// Module path of the models, instead of the one derived from `input`
    #[builder(default, setter(strip_option, into))]
    pub package: Option<String>,
}

impl GeneratorConfig {
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        Self::builder().input(input).build()
    }

    pub fn resolved_package(&self) -> String {
        self.package
            .clone()
            .unwrap_or_else(|| package_from_path(&self.input))
    }
}
