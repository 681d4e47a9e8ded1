//! Prediction result types.
//!
//! Represents the classifier output for a single policyholder or a batch.

use serde::{Deserialize, Serialize};

use super::features::UnknownCategory;
use super::table::Table;

/// Label of the "will claim" class.
pub const POSITIVE_CLASS: u8 = 1;

/// Name of the column appended to batch results.
pub const PREDICTION_COLUMN: &str = "prediction";

/// Human-facing interpretation of a predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    LikelyToClaim,
    UnlikelyToClaim,
}

impl Verdict {
    #[must_use]
    pub fn from_label(label: u8) -> Self {
        if label == POSITIVE_CLASS {
            Self::LikelyToClaim
        } else {
            Self::UnlikelyToClaim
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::LikelyToClaim => "likely to claim",
            Self::UnlikelyToClaim => "unlikely to claim",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LikelyToClaim => write!(f, "LIKELY"),
            Self::UnlikelyToClaim => write!(f, "UNLIKELY"),
        }
    }
}

/// Classifier output for one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClaimPrediction {
    /// Predicted class (1 = will claim)
    pub label: u8,

    /// Probability of the positive class (0.0 to 1.0)
    pub probability: f64,
}

impl ClaimPrediction {
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::from_label(self.label)
    }

    /// Probability rounded to two decimal places.
    #[must_use]
    pub fn probability_rounded(&self) -> f64 {
        (self.probability * 100.0).round() / 100.0
    }

    /// One-line message shown to the user.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "This policyholder is {} to claim. (Probability: {:.2})",
            self.verdict(),
            self.probability
        )
    }
}

/// Result of the single-record pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePrediction {
    pub prediction: ClaimPrediction,

    /// Categorical values the model has never seen; they were encoded as zeros.
    pub unknown_categories: Vec<UnknownCategory>,

    /// Schema columns the record did not supply; they were zero-filled.
    pub unfilled_columns: Vec<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SinglePrediction {
    #[must_use]
    pub fn new(
        prediction: ClaimPrediction,
        unknown_categories: Vec<UnknownCategory>,
        unfilled_columns: Vec<String>,
    ) -> Self {
        Self {
            prediction,
            unknown_categories,
            unfilled_columns,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Non-fatal findings of batch validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchWarning {
    /// Columns not in the schema; they were dropped before prediction.
    ExtraColumns(Vec<String>),
}

impl std::fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtraColumns(cols) => {
                write!(f, "Ignoring columns not used by the model: {}", cols.join(", "))
            }
        }
    }
}

/// Result of the batch pipeline: the validated table plus a prediction column.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPrediction {
    pub table: Table,
    pub warnings: Vec<BatchWarning>,
    pub positive_count: usize,
}

impl BatchPrediction {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }
}
