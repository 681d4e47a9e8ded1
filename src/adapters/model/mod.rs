//! Model adapter: Implementations of `Classifier` for exported model files.
//!
//! `model.json` is tagged by `kind`:
//! - `logistic`: standardized logistic regression
//! - `random_forest`: tree ensemble with flat node arrays

mod forest;
mod logistic;

use serde::{Deserialize, Serialize};

use crate::ports::{Classifier, ModelError};

pub use forest::{DecisionTree, ForestModel, TreeNode};
pub use logistic::LogisticModel;

/// A classifier loaded from `model.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    RandomForest(ForestModel),
}

impl ModelArtifact {
    /// Parse and validate a model from JSON text.
    ///
    /// # Errors
    /// Returns `ModelError::Malformed` if the JSON is invalid or the parameters
    /// are inconsistent.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self =
            serde_json::from_str(json).map_err(|e| ModelError::Malformed(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// # Errors
    /// Returns `ModelError::Malformed` if the parameters are inconsistent.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Logistic(m) => m.validate(),
            Self::RandomForest(m) => m.validate(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logistic(_) => "logistic",
            Self::RandomForest(_) => "random_forest",
        }
    }
}

impl Classifier for ModelArtifact {
    fn n_features(&self) -> usize {
        match self {
            Self::Logistic(m) => m.n_features(),
            Self::RandomForest(m) => m.n_features(),
        }
    }

    fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::Logistic(m) => m.feature_names(),
            Self::RandomForest(m) => m.feature_names(),
        }
    }

    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ModelError> {
        match self {
            Self::Logistic(m) => m.predict_proba(rows),
            Self::RandomForest(m) => m.predict_proba(rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_tagged_forest() {
        let json = r#"{
            "kind": "random_forest",
            "n_features": 1,
            "trees": [{"nodes": [
                {"feature": 0, "threshold": 2.5, "left": 1, "right": 2},
                {"value": [3, 1]},
                {"value": [0, 4]}
            ]}]
        }"#;
        let model = ModelArtifact::from_json(json).expect("parse");
        assert_eq!(model.kind(), "random_forest");
        assert_eq!(model.n_features(), 1);
        assert!(model.feature_names().is_none());

        let proba = model.predict_proba(&[vec![1.0]]).expect("proba");
        assert!((proba[0][1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_parses_tagged_logistic() {
        let json = r#"{
            "kind": "logistic",
            "feature_names": ["age"],
            "coefficients": [0.0],
            "intercept": 0.0
        }"#;
        let model = ModelArtifact::from_json(json).expect("parse");
        assert_eq!(model.kind(), "logistic");
        assert_eq!(model.feature_names(), Some(&["age".to_string()][..]));
        assert_eq!(model.predict(&[vec![42.0]]).expect("predict"), [0]);
    }

    #[test]
    fn test_rejects_unknown_kind_and_invalid_params() {
        assert!(ModelArtifact::from_json(r#"{"kind": "svm"}"#).is_err());
        assert!(ModelArtifact::from_json(
            r#"{"kind": "logistic", "feature_names": [], "coefficients": [], "intercept": 0}"#
        )
        .is_err());
    }
}
