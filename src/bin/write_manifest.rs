//! Integrity manifest writer for ClaimGuard model directories.
//!
//! Hashes the artifact files present in a model directory and writes
//! `manifest.json`, which the app then checks at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <model_dir>
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use claimguard::adapters::artifacts::{
    ArtifactManifest, ENCODER_FILE, MANIFEST_FILE, MODEL_FILE, SCHEMA_FILE,
};

#[derive(Parser)]
#[command(author, version, about = "Write manifest.json for a model directory", long_about = None)]
struct Cli {
    /// Directory containing model.json and model_columns.json
    model_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let model_dir = cli.model_dir;

    if !model_dir.is_dir() {
        return Err(anyhow!("Model directory not found: {model_dir:?}"));
    }

    for required in [MODEL_FILE, SCHEMA_FILE] {
        if !model_dir.join(required).exists() {
            return Err(anyhow!("{required} missing from {model_dir:?}"));
        }
    }

    let mut names = vec![MODEL_FILE, SCHEMA_FILE];
    if model_dir.join(ENCODER_FILE).exists() {
        names.push(ENCODER_FILE);
    }

    let manifest = ArtifactManifest::for_directory(&model_dir, &names)?;
    let json = serde_json::to_string_pretty(&manifest)?;
    let manifest_path = model_dir.join(MANIFEST_FILE);
    std::fs::write(&manifest_path, format!("{json}\n"))
        .with_context(|| format!("Failed to write {manifest_path:?}"))?;

    println!("Wrote {}", manifest_path.display());
    for (name, digest) in &manifest.files {
        println!("  {name}: {digest}");
    }
    Ok(())
}
