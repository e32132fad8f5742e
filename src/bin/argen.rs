//! Command line entry point.
//!
//! ```text
//! argen src/models.rs --output src/records.rs
//! ARGEN_FILE=src/models.rs argen
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use argen::GeneratorConfig;
use argen::config::{DEFAULT_MARKER, DEFAULT_OUTPUT, INPUT_ENV};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Rust file with the annotated structs
    #[arg(env = INPUT_ENV)]
    input: Option<PathBuf>,

    /// Where to write the generated module
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Doc comment prefix that marks a model
    #[arg(short, long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// Module path of the models (defaults to the input file's module)
    #[arg(short, long)]
    package: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let Some(input) = cli.input else {
        return ExitCode::FAILURE;
    };

    let config = GeneratorConfig {
        input,
        output: cli.output,
        marker: cli.marker,
        package: cli.package,
    };

    match argen::generate(&config) {
        Ok(models) => {
            info!(
                "Generated {} model(s) into {}",
                models.len(),
                config.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("argen: {err}");
            ExitCode::FAILURE
        }
    }
}
