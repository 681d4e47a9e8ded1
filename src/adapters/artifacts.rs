//! Artifact loader: reads the trained model, its column schema and the
//! categorical encoder from a model directory.
//!
//! # Layout
//!
//! - `model.json`: classifier (required)
//! - `model_columns.json`: ordered column names (required)
//! - `vehicle_type_encoder.json`: fitted label encoder (optional)
//! - `manifest.json`: SHA-256 digests of the files above (optional)
//!
//! # Integrity
//!
//! When a manifest is present, the model and schema must be listed in it, an
//! encoder file on disk must be listed too, and every listed file must match
//! its digest. The bytes that are hashed are the bytes that get parsed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::model::ModelArtifact;
use crate::domain::{ColumnSchema, LabelEncoder};

pub const MODEL_FILE: &str = "model.json";
pub const SCHEMA_FILE: &str = "model_columns.json";
pub const ENCODER_FILE: &str = "vehicle_type_encoder.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),

    #[error("Required artifact missing: {0:?}")]
    Missing(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Integrity check failed for {0}: digest does not match manifest")]
    DigestMismatch(String),

    #[error("Invalid manifest: {0}")]
    Manifest(String),
}

/// SHA-256 digests of the artifact files, keyed by file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Hash the named files in `dir`.
    ///
    /// # Errors
    /// Returns error if a file cannot be read.
    pub fn for_directory(dir: &Path, names: &[&str]) -> Result<Self, ArtifactError> {
        let mut files = BTreeMap::new();
        for name in names {
            let path = dir.join(name);
            let bytes = std::fs::read(&path).map_err(|source| ArtifactError::Read {
                path: path.clone(),
                source,
            })?;
            files.insert((*name).to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.version != MANIFEST_VERSION {
            return Err(ArtifactError::Manifest(format!(
                "unsupported version {}",
                self.version
            )));
        }
        for name in self.files.keys() {
            // Entries are bare file names inside the model directory.
            if name.is_empty() || name.contains(['/', '\\']) || name == ".." || name == "." {
                return Err(ArtifactError::Manifest(format!(
                    "entry '{name}' is not a plain file name"
                )));
            }
        }
        Ok(())
    }

    fn check(&self, name: &str, bytes: &[u8]) -> Result<(), ArtifactError> {
        let expected = self.files.get(name).ok_or_else(|| {
            ArtifactError::Manifest(format!("{name} is present but not listed"))
        })?;
        if !expected.eq_ignore_ascii_case(&sha256_hex(bytes)) {
            return Err(ArtifactError::DigestMismatch(name.to_string()));
        }
        Ok(())
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Everything loaded from a model directory.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub model: ModelArtifact,
    pub schema: ColumnSchema,
    pub encoder: Option<LabelEncoder>,
    /// Whether a manifest was present and verified.
    pub verified: bool,
}

fn read_file(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    std::fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(file: &str, message: impl ToString) -> ArtifactError {
    ArtifactError::Parse {
        file: file.to_string(),
        message: message.to_string(),
    }
}

/// Load the model, schema and optional encoder from `model_dir`.
///
/// # Errors
/// Returns error if a required file is missing, cannot be parsed, or fails
/// the manifest integrity check.
pub fn load_bundle(model_dir: &Path) -> Result<ModelBundle, ArtifactError> {
    if !model_dir.is_dir() {
        return Err(ArtifactError::DirectoryNotFound(model_dir.to_path_buf()));
    }

    let manifest_path = model_dir.join(MANIFEST_FILE);
    let manifest = if manifest_path.exists() {
        let bytes = read_file(&manifest_path)?;
        let manifest: ArtifactManifest =
            serde_json::from_slice(&bytes).map_err(|e| parse_error(MANIFEST_FILE, e))?;
        manifest.validate()?;

        for name in manifest.files.keys() {
            if !model_dir.join(name).exists() {
                return Err(ArtifactError::Missing(model_dir.join(name)));
            }
        }
        Some(manifest)
    } else {
        tracing::warn!(
            "No {} in {:?}; loading artifacts without integrity check",
            MANIFEST_FILE,
            model_dir
        );
        None
    };

    let load = |name: &str, required: bool| -> Result<Option<Vec<u8>>, ArtifactError> {
        let path = model_dir.join(name);
        if !path.exists() {
            return if required {
                Err(ArtifactError::Missing(path))
            } else {
                Ok(None)
            };
        }
        let bytes = read_file(&path)?;
        if let Some(manifest) = &manifest {
            manifest.check(name, &bytes)?;
        }
        Ok(Some(bytes))
    };

    let model_bytes = load(MODEL_FILE, true)?.unwrap_or_default();
    let model_json =
        std::str::from_utf8(&model_bytes).map_err(|e| parse_error(MODEL_FILE, e))?;
    let model = ModelArtifact::from_json(model_json).map_err(|e| parse_error(MODEL_FILE, e))?;

    let schema_bytes = load(SCHEMA_FILE, true)?.unwrap_or_default();
    let schema: ColumnSchema =
        serde_json::from_slice(&schema_bytes).map_err(|e| parse_error(SCHEMA_FILE, e))?;

    let encoder = match load(ENCODER_FILE, false)? {
        Some(bytes) => Some(
            serde_json::from_slice::<LabelEncoder>(&bytes)
                .map_err(|e| parse_error(ENCODER_FILE, e))?,
        ),
        None => None,
    };

    tracing::info!(
        "Loaded {} model from {:?} ({} columns, encoder: {}, verified: {})",
        model.kind(),
        model_dir,
        schema.len(),
        encoder.as_ref().map_or("none", |e| e.column()),
        manifest.is_some()
    );

    Ok(ModelBundle {
        model,
        schema,
        encoder,
        verified: manifest.is_some(),
    })
}
