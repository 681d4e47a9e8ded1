//! # ClaimGuard
//!
//! Claim-likelihood prediction front end for motor insurance policyholders.
//!
//! This crate provides:
//! - Single-record prediction from a typed policyholder form
//! - Batch prediction over uploaded delimited files with schema validation
//! - Terminal UI for interactive use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (policyholder, schema, encoder, tables)
//! - `ports`: Trait definitions for external operations (the classifier)
//! - `adapters`: Concrete implementations (model files, artifacts, csv)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{ClaimPrediction, PolicyholderRecord, Verdict};

/// Result type for ClaimGuard operations
pub type Result<T> = std::result::Result<T, ClaimGuardError>;

/// Main error type for ClaimGuard
#[derive(Debug, thiserror::Error)]
pub enum ClaimGuardError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Unknown categories in column '{column}': {}", .values.join(", "))]
    UnknownCategory { column: String, values: Vec<String> },

    #[error("Invalid number in column '{column}' at row {row}: '{value}'")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Artifact not loaded: {0}")]
    ArtifactNotLoaded(String),

    #[error("Model error: {0}")]
    Model(#[from] ports::ModelError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Invalid column schema: {0}")]
    Schema(#[from] domain::SchemaError),

    #[error("Invalid table: {0}")]
    Table(#[from] domain::TableError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
