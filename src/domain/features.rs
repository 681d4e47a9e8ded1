//! One-hot expansion and schema alignment for a single record.
//!
//! Alignment never fails: schema columns the record does not produce are
//! zero-filled, produced columns the schema does not know are dropped. A
//! categorical value whose indicator column is absent from the schema ends up
//! encoded as all zeros; such values are reported on the aligned row instead
//! of being masked.

use std::fmt;

use super::schema::ColumnSchema;

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Numeric(f64),
    Category(String),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Numeric(v)
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        Self::Numeric(f64::from(v))
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Category(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::Category(v)
    }
}

/// Ordered mapping from attribute name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, RawValue)>,
}

impl RawRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an attribute, keeping its original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Name of the indicator column for `attribute == category`.
#[must_use]
pub fn indicator_column(attribute: &str, category: &str) -> String {
    format!("{attribute}_{category}")
}

/// Expand a record: numeric attributes pass through under their own name,
/// categorical ones become a single `{attribute}_{category}` column set to 1.
#[must_use]
pub fn one_hot_expand(record: &RawRecord) -> Vec<(String, f64)> {
    record
        .iter()
        .map(|(name, value)| match value {
            RawValue::Numeric(v) => (name.to_string(), *v),
            RawValue::Category(c) => (indicator_column(name, c), 1.0),
        })
        .collect()
}

/// A categorical value with no indicator column in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory {
    pub attribute: String,
    pub value: String,
}

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}' was not seen in training", self.attribute, self.value)
    }
}

/// A single feature row whose columns equal the schema, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    columns: Vec<String>,
    values: Vec<f64>,
    unknown_categories: Vec<UnknownCategory>,
    unfilled_columns: Vec<String>,
}

impl AlignedRow {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Value of a named column, if the schema has it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    /// Categorical values that were encoded as all zeros.
    #[must_use]
    pub fn unknown_categories(&self) -> &[UnknownCategory] {
        &self.unknown_categories
    }

    /// Schema columns no supplied attribute accounts for; they hold the
    /// zero fill. Indicator columns of a supplied categorical attribute are
    /// never listed here.
    #[must_use]
    pub fn unfilled_columns(&self) -> &[String] {
        &self.unfilled_columns
    }
}

/// One-hot expand `record` and reindex it onto `schema`.
#[must_use]
pub fn align_record(record: &RawRecord, schema: &ColumnSchema) -> AlignedRow {
    let columns = schema.columns();
    let mut values = vec![0.0; columns.len()];
    let mut filled = vec![false; columns.len()];
    let mut unknown_categories = Vec::new();

    for (name, value) in record.iter() {
        match value {
            RawValue::Numeric(v) => match schema.position(name) {
                Some(i) => {
                    values[i] = *v;
                    filled[i] = true;
                }
                None => tracing::debug!("Dropping attribute '{}' not used by the model", name),
            },
            RawValue::Category(category) => {
                let prefix = indicator_column(name, "");
                for (i, column) in columns.iter().enumerate() {
                    if column.starts_with(&prefix) {
                        filled[i] = true;
                    }
                }

                let column = indicator_column(name, category);
                match schema.position(&column) {
                    Some(i) => values[i] = 1.0,
                    None if schema.has_indicators_for(name) => {
                        unknown_categories.push(UnknownCategory {
                            attribute: name.to_string(),
                            value: category.clone(),
                        });
                    }
                    None => {
                        tracing::debug!("Dropping attribute '{}' not used by the model", name)
                    }
                }
            }
        }
    }

    let unfilled_columns = columns
        .iter()
        .zip(&filled)
        .filter(|(_, &done)| !done)
        .map(|(column, _)| column.clone())
        .collect();

    AlignedRow {
        columns: columns.to_vec(),
        values,
        unknown_categories,
        unfilled_columns,
    }
}
