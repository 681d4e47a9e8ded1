//! Inference context: the classifier plus the feature metadata it was trained
//! with, loaded once per session.

use std::path::Path;

use crate::adapters::{load_bundle, ModelArtifact, ModelBundle};
use crate::domain::{ColumnSchema, LabelEncoder};
use crate::ports::Classifier;
use crate::ClaimGuardError;

/// Immutable bundle shared by both pipelines.
///
/// Construction checks that the classifier and the schema agree on the
/// feature count (and on the column names when the model records them) and
/// that a loaded encoder belongs to the designated categorical column.
#[derive(Debug)]
pub struct InferenceContext<C: Classifier> {
    classifier: C,
    schema: ColumnSchema,
    encoder: Option<LabelEncoder>,
    categorical_column: String,
    verified: bool,
}

impl<C: Classifier> InferenceContext<C> {
    /// # Errors
    /// Returns `ClaimGuardError::Validation` if the classifier width or its
    /// recorded column names differ from the schema, or the encoder was fitted
    /// on another column.
    pub fn new(
        classifier: C,
        schema: ColumnSchema,
        encoder: Option<LabelEncoder>,
        categorical_column: impl Into<String>,
    ) -> Result<Self, ClaimGuardError> {
        let categorical_column = categorical_column.into();

        if classifier.n_features() != schema.len() {
            return Err(ClaimGuardError::Validation(format!(
                "model expects {} features but the column schema lists {}",
                classifier.n_features(),
                schema.len()
            )));
        }

        if let Some(names) = classifier.feature_names() {
            if names != schema.columns() {
                let first_difference = names
                    .iter()
                    .zip(schema.columns())
                    .position(|(model, listed)| model != listed)
                    .unwrap_or(0);
                return Err(ClaimGuardError::Validation(format!(
                    "model was trained on columns in a different order: position {} is '{}' in the model but '{}' in the column schema",
                    first_difference + 1,
                    names[first_difference],
                    schema.columns()[first_difference]
                )));
            }
        }

        if let Some(encoder) = &encoder {
            if encoder.column() != categorical_column {
                return Err(ClaimGuardError::Validation(format!(
                    "encoder was fitted on '{}', expected '{}'",
                    encoder.column(),
                    categorical_column
                )));
            }
        }

        Ok(Self {
            classifier,
            schema,
            encoder,
            categorical_column,
            verified: false,
        })
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    #[must_use]
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    #[must_use]
    pub fn encoder(&self) -> Option<&LabelEncoder> {
        self.encoder.as_ref()
    }

    /// Batch column mapped through the encoder.
    #[must_use]
    pub fn categorical_column(&self) -> &str {
        &self.categorical_column
    }

    /// Whether the artifacts were checked against a manifest.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verified
    }
}

impl InferenceContext<ModelArtifact> {
    /// Build a context from a loaded artifact bundle.
    ///
    /// # Errors
    /// Returns the same errors as `InferenceContext::new`.
    pub fn from_bundle(
        bundle: ModelBundle,
        categorical_column: impl Into<String>,
    ) -> Result<Self, ClaimGuardError> {
        let mut context = Self::new(
            bundle.model,
            bundle.schema,
            bundle.encoder,
            categorical_column,
        )?;
        context.verified = bundle.verified;
        Ok(context)
    }

    /// Load the artifacts in `model_dir` and build a context.
    ///
    /// # Errors
    /// Returns error if loading fails or the artifacts disagree.
    pub fn load(
        model_dir: &Path,
        categorical_column: impl Into<String>,
    ) -> Result<Self, ClaimGuardError> {
        let bundle = load_bundle(model_dir)?;
        Self::from_bundle(bundle, categorical_column)
    }

    /// Model kind for status display.
    #[must_use]
    pub fn model_kind(&self) -> &'static str {
        self.classifier.kind()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{ColumnSchema, LabelEncoder};
    use crate::ports::{check_rows, Classifier, ModelError};

    use super::InferenceContext;

    /// Probability of a claim = `weights · row`, clamped to [0, 1].
    #[derive(Debug)]
    pub struct LinearStub {
        pub weights: Vec<f64>,
    }

    impl Classifier for LinearStub {
        fn n_features(&self) -> usize {
            self.weights.len()
        }

        fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ModelError> {
            check_rows(rows, self.weights.len())?;
            Ok(rows
                .iter()
                .map(|row| {
                    let p: f64 = row.iter().zip(&self.weights).map(|(x, w)| x * w).sum();
                    let p = p.clamp(0.0, 1.0);
                    [1.0 - p, p]
                })
                .collect())
        }
    }

    pub const BATCH_COLUMNS: [&str; 4] = ["age", "vehicle_type", "annual_premium", "claims_history"];

    /// Batch context: claims history drives the prediction.
    pub fn batch_context() -> InferenceContext<LinearStub> {
        let schema = ColumnSchema::new(BATCH_COLUMNS).expect("schema");
        let encoder = LabelEncoder::fit("vehicle_type", ["Sedan", "SUV", "Truck"]).expect("encoder");
        InferenceContext::new(
            LinearStub {
                weights: vec![0.0, 0.0, 0.0, 0.3],
            },
            schema,
            Some(encoder),
            "vehicle_type",
        )
        .expect("context")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::LinearStub;
    use super::*;

    fn schema() -> ColumnSchema {
        ColumnSchema::new(["age", "vehicle_type"]).expect("schema")
    }

    #[test]
    fn test_rejects_width_mismatch() {
        let err = InferenceContext::new(
            LinearStub {
                weights: vec![0.1; 3],
            },
            schema(),
            None,
            "vehicle_type",
        )
        .expect_err("width mismatch");
        assert!(matches!(err, ClaimGuardError::Validation(msg) if msg.contains("3 features")));
    }

    #[test]
    fn test_rejects_model_columns_in_other_order() {
        let model = ModelArtifact::from_json(
            r#"{
                "kind": "logistic",
                "feature_names": ["vehicle_age", "age"],
                "coefficients": [0.4, 0.01],
                "intercept": -1.0
            }"#,
        )
        .expect("model");
        let schema = ColumnSchema::new(["age", "vehicle_age"]).expect("schema");

        let err = InferenceContext::new(model, schema, None, "vehicle_type")
            .expect_err("column order mismatch");
        assert!(matches!(
            err,
            ClaimGuardError::Validation(msg) if msg.contains("position 1 is 'vehicle_age'")
        ));
    }

    #[test]
    fn test_accepts_model_columns_in_schema_order() {
        let model = ModelArtifact::from_json(
            r#"{
                "kind": "logistic",
                "feature_names": ["age", "vehicle_age"],
                "coefficients": [0.01, 0.4],
                "intercept": -1.0
            }"#,
        )
        .expect("model");
        let schema = ColumnSchema::new(["age", "vehicle_age"]).expect("schema");

        let context = InferenceContext::new(model, schema, None, "vehicle_type").expect("context");
        assert_eq!(context.model_kind(), "logistic");
    }

    #[test]
    fn test_rejects_encoder_for_other_column() {
        let encoder = LabelEncoder::fit("body_style", ["Coupe"]).expect("encoder");
        let err = InferenceContext::new(
            LinearStub {
                weights: vec![0.1; 2],
            },
            schema(),
            Some(encoder),
            "vehicle_type",
        )
        .expect_err("wrong encoder");
        assert!(matches!(err, ClaimGuardError::Validation(_)));
    }

    #[test]
    fn test_accessors() {
        let context = InferenceContext::new(
            LinearStub {
                weights: vec![0.1; 2],
            },
            schema(),
            None,
            "vehicle_type",
        )
        .expect("context");
        assert_eq!(context.schema().len(), 2);
        assert!(context.encoder().is_none());
        assert_eq!(context.categorical_column(), "vehicle_type");
        assert!(!context.is_verified());
    }
}
