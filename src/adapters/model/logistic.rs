//! Logistic regression exported as plain JSON.

use serde::{Deserialize, Serialize};

use crate::ports::{check_rows, Classifier, ModelError};

/// Standardized logistic regression.
///
/// `p(claim) = sigmoid(intercept + sum(coef_i * (x_i - mean_i) / scale_i))`.
/// Without a scaler the features are used as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scaler_scale: Option<Vec<f64>>,
}

impl LogisticModel {
    /// Sanity-check parameter shapes and values.
    ///
    /// # Errors
    /// Returns `ModelError::Malformed` describing the first problem found.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ModelError::Malformed("logistic model has no features".into()));
        }
        if self.coefficients.len() != n {
            return Err(ModelError::Malformed(format!(
                "{} coefficients for {n} features",
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Malformed("non-finite coefficient".into()));
        }

        match (&self.scaler_mean, &self.scaler_scale) {
            (None, None) => {}
            (Some(mean), Some(scale)) => {
                if mean.len() != n || scale.len() != n {
                    return Err(ModelError::Malformed(
                        "scaler lengths do not match feature_names length".into(),
                    ));
                }
                if scale.iter().any(|s| !s.is_finite() || *s == 0.0)
                    || mean.iter().any(|m| !m.is_finite())
                {
                    return Err(ModelError::Malformed(
                        "scaler contains zero or non-finite values".into(),
                    ));
                }
            }
            _ => {
                return Err(ModelError::Malformed(
                    "scaler_mean and scaler_scale must be given together".into(),
                ))
            }
        }

        Ok(())
    }

    fn decision(&self, row: &[f64]) -> f64 {
        let standardized = row.iter().enumerate().map(|(i, x)| {
            match (&self.scaler_mean, &self.scaler_scale) {
                (Some(mean), Some(scale)) => (x - mean[i]) / scale[i],
                _ => *x,
            }
        });

        self.intercept
            + standardized
                .zip(&self.coefficients)
                .map(|(x, c)| x * c)
                .sum::<f64>()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }

    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ModelError> {
        check_rows(rows, self.n_features())?;
        Ok(rows
            .iter()
            .map(|row| {
                let p = sigmoid(self.decision(row));
                [1.0 - p, p]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LogisticModel {
        LogisticModel {
            feature_names: vec!["a".into(), "b".into()],
            coefficients: vec![2.0, -1.0],
            intercept: 0.5,
            scaler_mean: None,
            scaler_scale: None,
        }
    }

    #[test]
    fn test_probability_matches_sigmoid() {
        let proba = model().predict_proba(&[vec![1.0, 3.0]]).expect("proba");
        // z = 0.5 + 2 - 3 = -0.5
        let expected = 1.0 / (1.0 + 0.5f64.exp());
        assert!((proba[0][1] - expected).abs() < 1e-12);
        assert!((proba[0][0] + proba[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(model().predict(&[vec![1.0, 3.0]]).expect("predict"), [0]);
    }

    #[test]
    fn test_scaler_is_applied() {
        let mut m = model();
        m.scaler_mean = Some(vec![1.0, 3.0]);
        m.scaler_scale = Some(vec![2.0, 2.0]);
        m.validate().expect("valid");

        // Standardized row is all zeros, so only the intercept remains.
        let proba = m.predict_proba(&[vec![1.0, 3.0]]).expect("proba");
        assert!((proba[0][1] - sigmoid(0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let mut m = model();
        m.coefficients.pop();
        assert!(m.validate().is_err());

        let mut m = model();
        m.scaler_mean = Some(vec![0.0, 0.0]);
        assert!(m.validate().is_err());

        let mut m = model();
        m.scaler_mean = Some(vec![0.0, 0.0]);
        m.scaler_scale = Some(vec![1.0, 0.0]);
        assert!(m.validate().is_err());
    }
}
