//! Classifier port: Trait for the pre-trained claim model.
//!
//! This trait abstracts the concrete model format from the pipelines. The
//! model is opaque: the pipelines only rely on its declared feature count and
//! its two prediction operations.

/// Errors raised by a classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Row {row} has {found} features, model expects {expected}")]
    FeatureCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} contains a non-finite feature value")]
    NonFinite { row: usize },

    #[error("Malformed model: {0}")]
    Malformed(String),
}

/// Trait for binary classifiers.
///
/// Class 0 is "will not claim", class 1 is "will claim".
pub trait Classifier: Send + Sync {
    /// Number of features each row must have, in schema order.
    fn n_features(&self) -> usize;

    /// Training column names in input order, when the model records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Per-class probabilities `[p(class 0), p(class 1)]` for each row.
    ///
    /// # Errors
    /// Returns `ModelError::FeatureCount` if a row has the wrong width.
    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ModelError>;

    /// Predicted label for each row: the class with the highest probability,
    /// ties going to class 0.
    ///
    /// # Errors
    /// Returns the same errors as `predict_proba`.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>, ModelError> {
        Ok(self
            .predict_proba(rows)?
            .iter()
            .map(|[p0, p1]| u8::from(p1 > p0))
            .collect())
    }
}

/// Check every row's width and values against the model's feature count.
///
/// # Errors
/// Returns the first offending row (1-based).
pub fn check_rows(rows: &[Vec<f64>], expected: usize) -> Result<(), ModelError> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != expected {
            return Err(ModelError::FeatureCount {
                row: i + 1,
                expected,
                found: row.len(),
            });
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite { row: i + 1 });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl Classifier for Fixed {
        fn n_features(&self) -> usize {
            1
        }

        fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ModelError> {
            check_rows(rows, 1)?;
            Ok(rows.iter().map(|_| [1.0 - self.0, self.0]).collect())
        }
    }

    #[test]
    fn test_predict_is_argmax() {
        let rows = vec![vec![0.0]];
        assert_eq!(Fixed(0.8).predict(&rows).expect("predict"), [1]);
        assert_eq!(Fixed(0.2).predict(&rows).expect("predict"), [0]);
        assert_eq!(Fixed(0.5).predict(&rows).expect("predict"), [0]);
    }

    #[test]
    fn test_feature_names_default_to_none() {
        assert!(Fixed(0.5).feature_names().is_none());
    }

    #[test]
    fn test_check_rows() {
        let err = Fixed(0.5)
            .predict(&[vec![0.0], vec![0.0, 1.0]])
            .expect_err("wrong width");
        assert_eq!(
            err,
            ModelError::FeatureCount {
                row: 2,
                expected: 1,
                found: 2
            }
        );

        assert_eq!(
            check_rows(&[vec![f64::NAN]], 1),
            Err(ModelError::NonFinite { row: 1 })
        );
    }
}
