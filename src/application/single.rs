//! Single-record pipeline: form record -> one-hot expansion -> schema
//! alignment -> classifier -> verdict.

use std::sync::Arc;

use crate::domain::{
    align_record, AlignedRow, ClaimPrediction, PolicyholderRecord, RawRecord, SinglePrediction,
};
use crate::ports::Classifier;
use crate::ClaimGuardError;

use super::context::InferenceContext;

/// Service for predicting one policyholder at a time.
pub struct SinglePredictionService<C: Classifier> {
    context: Arc<InferenceContext<C>>,
}

impl<C: Classifier> SinglePredictionService<C> {
    pub fn new(context: Arc<InferenceContext<C>>) -> Self {
        Self { context }
    }

    /// Encode `record` onto the schema without running the model.
    #[must_use]
    pub fn align(&self, record: &RawRecord) -> AlignedRow {
        align_record(record, self.context.schema())
    }

    /// Run the full single-record pipeline on an untyped record.
    ///
    /// Categorical values the schema has no indicator for, and schema columns
    /// the record leaves unset, do not fail the prediction; they are returned
    /// on the result and logged.
    ///
    /// # Errors
    /// Returns error if the classifier rejects the aligned row.
    pub fn predict_record(&self, record: &RawRecord) -> Result<SinglePrediction, ClaimGuardError> {
        let aligned = self.align(record);
        tracing::debug!("Aligned record onto {} schema columns", aligned.values().len());

        for unknown in aligned.unknown_categories() {
            tracing::warn!(
                "Unknown category {}; its indicator columns are all zero",
                unknown
            );
        }

        if !aligned.unfilled_columns().is_empty() {
            tracing::warn!(
                "Record supplies no value for schema columns [{}]; they are zero-filled",
                aligned.unfilled_columns().join(", ")
            );
        }

        let unknown_categories = aligned.unknown_categories().to_vec();
        let unfilled_columns = aligned.unfilled_columns().to_vec();
        let rows = vec![aligned.into_values()];

        let classifier = self.context.classifier();
        let label = first(classifier.predict(&rows)?)?;
        let [_, probability] = first(classifier.predict_proba(&rows)?)?;

        let prediction = ClaimPrediction { label, probability };
        tracing::info!(
            "Single prediction complete: verdict={}, probability={:.2}",
            prediction.verdict(),
            prediction.probability
        );

        Ok(SinglePrediction::new(
            prediction,
            unknown_categories,
            unfilled_columns,
        ))
    }

    /// Validate and predict a typed form record.
    ///
    /// # Errors
    /// Returns `ClaimGuardError::Validation` listing every out-of-range
    /// attribute, or any error of `predict_record`.
    pub fn predict_policyholder(
        &self,
        record: &PolicyholderRecord,
    ) -> Result<SinglePrediction, ClaimGuardError> {
        record
            .validate()
            .map_err(|errors| ClaimGuardError::Validation(errors.join("; ")))?;
        self.predict_record(&record.to_raw_record())
    }

    #[must_use]
    pub fn context(&self) -> &InferenceContext<C> {
        &self.context
    }
}

fn first<T>(values: Vec<T>) -> Result<T, ClaimGuardError> {
    values.into_iter().next().ok_or_else(|| {
        ClaimGuardError::Model(crate::ports::ModelError::Malformed(
            "classifier returned no output for the row".into(),
        ))
    })
}
