//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundary between
//! the pipelines and the pre-trained model.

mod classifier;

pub use classifier::{check_rows, Classifier, ModelError};
