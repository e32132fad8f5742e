//! Generates the persistence module for `src/models.rs` into `OUT_DIR`.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use argen::GeneratorConfig;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=src/models.rs");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let output = out_dir.join("records.rs");

    let config = GeneratorConfig::builder()
        .input(manifest_dir.join("src").join("models.rs"))
        .output(output.clone())
        .package("crate::models")
        .build();
    argen::generate(&config)?;

    // The generated file opens with inner attributes, so it has to be a file
    // module rather than an `include!` body.
    let declaration = format!(
        "#[path = {:?}]\npub mod records;\n",
        output.display().to_string()
    );
    fs::write(out_dir.join("records_mod.rs"), declaration)?;
    Ok(())
}
