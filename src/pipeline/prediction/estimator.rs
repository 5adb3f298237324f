use serde::{Deserialize, Serialize};

use super::{BundleError, PredictionError};

/// Trained binary classifier, exported as plain parameters.
///
/// Every variant reduces to a real-valued decision; class 1 when it is
/// strictly positive, class 0 otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    /// Linear decision function (linear-kernel SVM).
    Linear { coef: Vec<f64>, intercept: f64 },
    /// Logistic regression; the sign of the logit decides the class.
    Logistic { coef: Vec<f64>, intercept: f64 },
    /// Gradient-boosted regression trees on the log-odds scale.
    GradientBoosting {
        init: f64,
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    },
}

/// Flat node array; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go left when `x[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { value: f64 },
}

impl RegressionTree {
    /// Children must sit after their parent, which also rules out cycles.
    fn validate(&self, n_features: usize) -> Result<(), BundleError> {
        if self.nodes.is_empty() {
            return Err(BundleError::InvalidTree("tree has no nodes".into()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= n_features {
                    return Err(BundleError::InvalidTree(format!(
                        "node {i} splits on feature {feature}, model has {n_features}"
                    )));
                }
                for child in [left, right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(BundleError::InvalidTree(format!(
                            "node {i} points to child {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

impl Estimator {
    /// Input width fixed by the parameters, if the variant fixes one.
    pub fn n_features(&self) -> Option<usize> {
        match self {
            Self::Linear { coef, .. } | Self::Logistic { coef, .. } => Some(coef.len()),
            Self::GradientBoosting { .. } => None,
        }
    }

    /// Check internal consistency against the schema width.
    pub fn validate(&self, n_features: usize) -> Result<(), BundleError> {
        if let Some(found) = self.n_features() {
            if found != n_features {
                return Err(BundleError::DimensionMismatch {
                    component: "estimator",
                    expected: n_features,
                    found,
                });
            }
        }
        if let Self::GradientBoosting { trees, .. } = self {
            for tree in trees {
                tree.validate(n_features)?;
            }
        }
        Ok(())
    }

    pub fn decision(&self, x: &[f64]) -> f64 {
        match self {
            Self::Linear { coef, intercept } | Self::Logistic { coef, intercept } => {
                coef.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + intercept
            }
            Self::GradientBoosting {
                init,
                learning_rate,
                trees,
            } => init + learning_rate * trees.iter().map(|t| t.evaluate(x)).sum::<f64>(),
        }
    }

    /// Predicted class, 0 or 1. Expects already-scaled input of validated width.
    pub fn predict(&self, x: &[f64], n_features: usize) -> Result<u8, PredictionError> {
        if x.len() != n_features {
            return Err(PredictionError::InputLength {
                expected: n_features,
                found: x.len(),
            });
        }
        Ok(u8::from(self.decision(x) > 0.0))
    }
}
