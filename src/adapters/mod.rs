//! Adapters layer: Concrete implementations of ports and I/O.
//!
//! - `model`: `Classifier` implementations for exported model files
//! - `artifacts`: Loading and integrity checking of the model directory
//! - `tabular`: Reading batch files and writing prediction exports (csv)
//! - `sanitize`: PII filtering for logs

pub mod artifacts;
pub mod model;
pub mod sanitize;
pub mod tabular;

pub use artifacts::{load_bundle, ArtifactError, ArtifactManifest, ModelBundle};
pub use model::ModelArtifact;
