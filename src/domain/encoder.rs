//! Fitted label encoder for the batch pipeline's categorical column.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncoderError {
    #[error("Encoder for '{0}' has no classes")]
    NoClasses(String),

    #[error("Encoder for '{column}' lists class '{class}' more than once")]
    DuplicateClass { column: String, class: String },
}

#[derive(Deserialize)]
struct EncoderFile {
    column: String,
    classes: Vec<String>,
}

/// Maps known category labels to integer codes.
///
/// A label's code is its position in `classes`, which is the order the
/// encoder was fitted with (sorted labels for a standard label encoder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// # Errors
    /// Returns error if `classes` is empty or contains duplicates.
    pub fn new(
        column: impl Into<String>,
        classes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, EncoderError> {
        let column = column.into();
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();

        if classes.is_empty() {
            return Err(EncoderError::NoClasses(column));
        }
        for (i, class) in classes.iter().enumerate() {
            if classes[..i].contains(class) {
                return Err(EncoderError::DuplicateClass {
                    column,
                    class: class.clone(),
                });
            }
        }

        Ok(Self { column, classes })
    }

    /// Fit an encoder the way a standard label encoder does: sorted, unique labels.
    ///
    /// # Errors
    /// Returns error if no labels are given.
    pub fn fit<'a>(
        column: impl Into<String>,
        labels: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, EncoderError> {
        let mut classes: Vec<String> = labels.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();
        Self::new(column, classes)
    }

    /// Name of the column this encoder was fitted on.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Integer code for `label`, or `None` if it was never seen during fitting.
    #[must_use]
    pub fn encode(&self, label: &str) -> Option<i64> {
        self.classes
            .iter()
            .position(|c| c == label)
            .map(|i| i as i64)
    }
}

impl<'de> Deserialize<'de> for LabelEncoder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let file = EncoderFile::deserialize(deserializer)?;
        Self::new(file.column, file.classes).map_err(serde::de::Error::custom)
    }
}
