//! Random forest exported as flat node arrays.
//!
//! Each tree is a list of nodes where node 0 is the root. A split node sends
//! a row left when `x[feature] <= threshold`; a leaf (no `feature`) holds the
//! class distribution (counts or fractions) of its training samples. The
//! forest probability is the mean of the normalized leaf distributions.

use serde::{Deserialize, Serialize};

use crate::ports::{check_rows, Classifier, ModelError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    #[serde(default)]
    pub value: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, tree: usize, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Malformed(format!("tree {tree} has no nodes")));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node.feature {
                Some(feature) => {
                    if feature >= n_features {
                        return Err(ModelError::Malformed(format!(
                            "tree {tree} node {i} splits on feature {feature}, model has {n_features}"
                        )));
                    }
                    if !node.threshold.is_finite() {
                        return Err(ModelError::Malformed(format!(
                            "tree {tree} node {i} has a non-finite threshold"
                        )));
                    }
                    // Children must come after their parent so traversal terminates.
                    let len = self.nodes.len();
                    if node.left <= i || node.right <= i || node.left >= len || node.right >= len {
                        return Err(ModelError::Malformed(format!(
                            "tree {tree} node {i} has invalid children ({}, {})",
                            node.left, node.right
                        )));
                    }
                }
                None => {
                    let [a, b] = node.value;
                    if !(a.is_finite() && b.is_finite()) || a < 0.0 || b < 0.0 || a + b <= 0.0 {
                        return Err(ModelError::Malformed(format!(
                            "tree {tree} leaf {i} has an invalid class distribution"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_distribution(&self, row: &[f64]) -> [f64; 2] {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            match node.feature {
                Some(feature) => {
                    idx = if row[feature] <= node.threshold {
                        node.left
                    } else {
                        node.right
                    };
                }
                None => {
                    let [a, b] = node.value;
                    let total = a + b;
                    return [a / total, b / total];
                }
            }
        }
    }
}

/// Ensemble of decision trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl ForestModel {
    /// # Errors
    /// Returns `ModelError::Malformed` if the forest is empty or a tree is not
    /// a well-formed node array.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::Malformed("forest has no features".into()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Malformed("forest has no trees".into()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(t, self.n_features)?;
        }
        Ok(())
    }
}

impl Classifier for ForestModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ModelError> {
        check_rows(rows, self.n_features)?;
        let n_trees = self.trees.len() as f64;

        Ok(rows
            .iter()
            .map(|row| {
                let [s0, s1] = self.trees.iter().fold([0.0, 0.0], |[s0, s1], tree| {
                    let [p0, p1] = tree.leaf_distribution(row);
                    [s0 + p0, s1 + p1]
                });
                [s0 / n_trees, s1 / n_trees]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: [f64; 2]) -> TreeNode {
        TreeNode {
            feature: None,
            threshold: 0.0,
            left: 0,
            right: 0,
            value,
        }
    }

    fn stump(feature: usize, threshold: f64, left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode {
                    feature: Some(feature),
                    threshold,
                    left: 1,
                    right: 2,
                    value: [0.0, 0.0],
                },
                leaf(left),
                leaf(right),
            ],
        }
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = ForestModel {
            n_features: 2,
            trees: vec![
                stump(0, 40.0, [8.0, 2.0], [2.0, 8.0]),
                stump(1, 1.0, [1.0, 0.0], [0.0, 1.0]),
            ],
        };
        forest.validate().expect("valid");

        let proba = forest
            .predict_proba(&[vec![30.0, 0.0], vec![50.0, 3.0]])
            .expect("proba");
        assert!((proba[0][1] - 0.1).abs() < 1e-12);
        assert!((proba[1][1] - 0.9).abs() < 1e-12);
        assert_eq!(
            forest
                .predict(&[vec![30.0, 0.0], vec![50.0, 3.0]])
                .expect("predict"),
            [0, 1]
        );
    }

    #[test]
    fn test_threshold_goes_left_when_equal() {
        let forest = ForestModel {
            n_features: 1,
            trees: vec![stump(0, 5.0, [1.0, 0.0], [0.0, 1.0])],
        };
        let proba = forest.predict_proba(&[vec![5.0]]).expect("proba");
        assert_eq!(proba[0], [1.0, 0.0]);
    }

    #[test]
    fn test_validate_rejects_cycles_and_bad_features() {
        let mut tree = stump(0, 1.0, [1.0, 0.0], [0.0, 1.0]);
        tree.nodes[0].left = 0;
        let forest = ForestModel {
            n_features: 1,
            trees: vec![tree],
        };
        assert!(forest.validate().is_err());

        let forest = ForestModel {
            n_features: 1,
            trees: vec![stump(3, 1.0, [1.0, 0.0], [0.0, 1.0])],
        };
        assert!(forest.validate().is_err());

        let forest = ForestModel {
            n_features: 1,
            trees: vec![DecisionTree {
                nodes: vec![leaf([0.0, 0.0])],
            }],
        };
        assert!(forest.validate().is_err());
    }
}
