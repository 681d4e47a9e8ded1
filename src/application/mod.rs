//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the two prediction pipelines over a shared `InferenceContext`.

mod batch;
mod context;
mod single;

pub use batch::{encode_features, validate_columns, BatchPredictionService, ValidatedTable};
pub use context::InferenceContext;
pub use single::SinglePredictionService;
