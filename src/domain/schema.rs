//! Expected column schema: the ordered feature names the classifier was
//! trained on.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Errors raised when a schema artifact is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema has no columns")]
    Empty,

    #[error("Schema column {0} has an empty name")]
    EmptyName(usize),

    #[error("Schema lists column '{0}' more than once")]
    Duplicate(String),
}

/// Ordered, duplicate-free list of column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColumnSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl ColumnSchema {
    /// Build a schema from column names.
    ///
    /// # Errors
    /// Returns error if the list is empty, a name is empty, or a name repeats.
    pub fn new<I, S>(columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::EmptyName(i));
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        Ok(Self { columns, index })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Position of a column in schema order.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Whether the schema carries any one-hot indicator for `attribute`
    /// (a column named `{attribute}_...`).
    #[must_use]
    pub fn has_indicators_for(&self, attribute: &str) -> bool {
        let prefix = format!("{attribute}_");
        self.columns.iter().any(|c| c.starts_with(&prefix))
    }

    /// Schema columns absent from `present`, in schema order.
    #[must_use]
    pub fn missing_from(&self, present: &[String]) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !present.contains(c))
            .cloned()
            .collect()
    }

    /// Columns of `present` that are not part of the schema, in their given order.
    #[must_use]
    pub fn extra_in(&self, present: &[String]) -> Vec<String> {
        present
            .iter()
            .filter(|c| !self.contains(c))
            .cloned()
            .collect()
    }
}

impl TryFrom<Vec<String>> for ColumnSchema {
    type Error = SchemaError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<ColumnSchema> for Vec<String> {
    fn from(schema: ColumnSchema) -> Self {
        schema.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicates() {
        let err = ColumnSchema::new(["age", "age"]).expect_err("Should reject");
        assert_eq!(err, SchemaError::Duplicate("age".into()));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            ColumnSchema::new(Vec::<String>::new()).expect_err("Should reject"),
            SchemaError::Empty
        );
        assert_eq!(
            ColumnSchema::new(["age", " "]).expect_err("Should reject"),
            SchemaError::EmptyName(1)
        );
    }

    #[test]
    fn test_missing_and_extra() {
        let schema = ColumnSchema::new(["age", "vehicle_age", "vehicle_type"]).expect("schema");
        let present = vec!["notes".to_string(), "age".to_string()];

        assert_eq!(schema.missing_from(&present), ["vehicle_age", "vehicle_type"]);
        assert_eq!(schema.extra_in(&present), ["notes"]);
    }

    #[test]
    fn test_deserializes_from_json_array() {
        let schema: ColumnSchema =
            serde_json::from_str(r#"["age", "gender_Male"]"#).expect("parse");
        assert_eq!(schema.position("gender_Male"), Some(1));
        assert!(schema.has_indicators_for("gender"));
        assert!(!schema.has_indicators_for("region"));

        let dup: Result<ColumnSchema, _> = serde_json::from_str(r#"["a", "a"]"#);
        assert!(dup.is_err());
    }
}
