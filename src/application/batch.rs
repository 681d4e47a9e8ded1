//! Batch pipeline: uploaded table -> column validation -> reorder ->
//! categorical encoding -> classifier -> annotated table.
//!
//! Every stage short-circuits: a batch either predicts every row or none.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::tabular;
use crate::domain::{
    BatchPrediction, BatchWarning, ColumnSchema, LabelEncoder, Table, PREDICTION_COLUMN,
};
use crate::ports::Classifier;
use crate::ClaimGuardError;

use super::context::InferenceContext;

/// A table whose columns are exactly the schema's, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTable {
    pub table: Table,
    pub warnings: Vec<BatchWarning>,
}

/// Check `table` against `schema` and reorder it.
///
/// # Errors
/// Returns `ClaimGuardError::MissingColumns` listing every schema column the
/// table lacks, in schema order.
pub fn validate_columns(
    table: &Table,
    schema: &ColumnSchema,
) -> Result<ValidatedTable, ClaimGuardError> {
    let missing = schema.missing_from(table.columns());
    if !missing.is_empty() {
        return Err(ClaimGuardError::MissingColumns(missing));
    }

    let mut warnings = Vec::new();
    let extra = schema.extra_in(table.columns());
    if !extra.is_empty() {
        let warning = BatchWarning::ExtraColumns(extra);
        tracing::warn!("{}", warning);
        warnings.push(warning);
    }

    let table = table.select(schema.columns()).ok_or_else(|| {
        ClaimGuardError::MissingColumns(schema.missing_from(table.columns()))
    })?;
    tracing::debug!("Validated {} rows against {} columns", table.row_count(), schema.len());

    Ok(ValidatedTable { table, warnings })
}

/// Convert a validated table into the classifier's feature matrix.
///
/// `categorical_column`, when present, is mapped through `encoder`; every
/// other cell must be a finite number.
///
/// # Errors
/// - `ArtifactNotLoaded` if the table has the categorical column but no
///   encoder is available
/// - `UnknownCategory` listing every distinct unseen label, in first-seen order
/// - `InvalidNumber` for the first cell that is not a finite number
pub fn encode_features(
    table: &Table,
    encoder: Option<&LabelEncoder>,
    categorical_column: &str,
) -> Result<Vec<Vec<f64>>, ClaimGuardError> {
    let categorical_idx = table.column_index(categorical_column);

    let encoder = match (categorical_idx, encoder) {
        (Some(_), None) => {
            return Err(ClaimGuardError::ArtifactNotLoaded(format!(
                "label encoder for '{categorical_column}'"
            )))
        }
        (_, encoder) => encoder,
    };

    if let (Some(idx), Some(encoder)) = (categorical_idx, encoder) {
        let mut unknown: Vec<String> = Vec::new();
        for row in table.rows() {
            let label = row[idx].trim();
            if encoder.encode(label).is_none() && !unknown.iter().any(|u| u == label) {
                unknown.push(label.to_string());
            }
        }
        if !unknown.is_empty() {
            return Err(ClaimGuardError::UnknownCategory {
                column: categorical_column.to_string(),
                values: unknown,
            });
        }
    }

    let columns = table.columns();
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, cell)| match (Some(c) == categorical_idx, encoder) {
                    (true, Some(encoder)) => encoder
                        .encode(cell.trim())
                        .map(|code| code as f64)
                        .ok_or_else(|| ClaimGuardError::UnknownCategory {
                            column: categorical_column.to_string(),
                            values: vec![cell.trim().to_string()],
                        }),
                    _ => parse_number(cell).ok_or_else(|| ClaimGuardError::InvalidNumber {
                        column: columns[c].clone(),
                        row: r + 1,
                        value: cell.clone(),
                    }),
                })
                .collect::<Result<Vec<f64>, ClaimGuardError>>()
        })
        .collect()
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Service for predicting uploaded tables.
pub struct BatchPredictionService<C: Classifier> {
    context: Arc<InferenceContext<C>>,
}

impl<C: Classifier> BatchPredictionService<C> {
    pub fn new(context: Arc<InferenceContext<C>>) -> Self {
        Self { context }
    }

    /// Validate, encode and predict every row of `table`.
    ///
    /// # Errors
    /// Returns the first failing stage's error; no partial results.
    pub fn predict_table(&self, table: &Table) -> Result<BatchPrediction, ClaimGuardError> {
        let context = &self.context;
        tracing::info!("Starting batch prediction for {} rows...", table.row_count());

        let ValidatedTable { table, warnings } = validate_columns(table, context.schema())?;
        let features = encode_features(&table, context.encoder(), context.categorical_column())?;
        tracing::debug!("Encoded {} feature rows", features.len());

        let labels = context.classifier().predict(&features)?;
        if labels.len() != table.row_count() {
            return Err(ClaimGuardError::Model(crate::ports::ModelError::Malformed(
                format!(
                    "classifier returned {} labels for {} rows",
                    labels.len(),
                    table.row_count()
                ),
            )));
        }

        let positive_count = labels
            .iter()
            .filter(|&&l| l == crate::domain::POSITIVE_CLASS)
            .count();
        let table = table.with_column(
            PREDICTION_COLUMN,
            labels.iter().map(ToString::to_string).collect(),
        )?;

        tracing::info!(
            "Batch prediction complete: {} rows, {} likely to claim",
            table.row_count(),
            positive_count
        );

        Ok(BatchPrediction {
            table,
            warnings,
            positive_count,
        })
    }

    /// Read a delimited file and predict it.
    ///
    /// # Errors
    /// Returns error if the file cannot be parsed or any stage fails.
    pub fn predict_file(
        &self,
        path: &Path,
        delimiter: u8,
    ) -> Result<BatchPrediction, ClaimGuardError> {
        let table = tabular::read_table_path(path, delimiter)?;
        self.predict_table(&table)
    }

    /// Write the annotated table as comma-separated text.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub fn export(&self, result: &BatchPrediction, path: &Path) -> Result<(), ClaimGuardError> {
        tabular::write_table_path(path, &result.table)
    }

    #[must_use]
    pub fn context(&self) -> &InferenceContext<C> {
        &self.context
    }
}
