//! Estimator definitions exported by the training pipeline.
//!
//! Three estimator families are understood: a single decision tree, a random
//! forest (mean of normalized leaf distributions), and a multinomial logistic
//! regression with an optional standard scaler.

use serde::{Deserialize, Serialize};

use crate::domain::FEATURE_COUNT;

/// Trained estimator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    DecisionTree(Tree),
    RandomForest {
        trees: Vec<Tree>,
    },
    MultinomialLogistic {
        /// One row of `FEATURE_COUNT` weights per class
        weights: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        #[serde(default)]
        scaler: Option<StandardScaler>,
    },
}

/// Binary decision tree stored as a flat node list rooted at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// A split goes left when `x[feature] <= threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Per-class sample weights
        value: Vec<f64>,
    },
}

/// Standardization applied before the linear model: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Estimator {
    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DecisionTree(_) => "decision_tree",
            Self::RandomForest { .. } => "random_forest",
            Self::MultinomialLogistic { .. } => "multinomial_logistic",
        }
    }

    /// Check structural consistency against the number of classes.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self, n_classes: usize) -> Result<(), String> {
        match self {
            Self::DecisionTree(tree) => tree.validate(n_classes),
            Self::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("random_forest has no trees".into());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(n_classes)
                        .map_err(|e| format!("tree {i}: {e}"))?;
                }
                Ok(())
            }
            Self::MultinomialLogistic {
                weights,
                intercepts,
                scaler,
            } => {
                if weights.len() != n_classes || intercepts.len() != n_classes {
                    return Err(format!(
                        "expected {n_classes} weight rows and intercepts, got {} and {}",
                        weights.len(),
                        intercepts.len()
                    ));
                }
                if let Some(row) = weights.iter().position(|w| w.len() != FEATURE_COUNT) {
                    return Err(format!(
                        "weight row {row} has {} entries, expected {FEATURE_COUNT}",
                        weights[row].len()
                    ));
                }
                if weights.iter().flatten().chain(intercepts).any(|v| !v.is_finite()) {
                    return Err("non-finite weight or intercept".into());
                }
                if let Some(scaler) = scaler {
                    scaler.validate()?;
                }
                Ok(())
            }
        }
    }

    /// Index into the class list for one feature row.
    ///
    /// Assumes `validate` has passed.
    #[must_use]
    pub fn predict_index(&self, x: &[f64]) -> usize {
        match self {
            Self::DecisionTree(tree) => argmax(tree.leaf(x)),
            Self::RandomForest { trees } => {
                let mut mean = vec![0.0; tree_width(trees)];
                for tree in trees {
                    let leaf = tree.leaf(x);
                    let total: f64 = leaf.iter().sum();
                    for (acc, v) in mean.iter_mut().zip(leaf) {
                        *acc += v / total;
                    }
                }
                argmax(&mean)
            }
            Self::MultinomialLogistic {
                weights,
                intercepts,
                scaler,
            } => {
                let scaled: Vec<f64> = match scaler {
                    Some(s) => s.transform(x),
                    None => x.to_vec(),
                };
                let scores: Vec<f64> = weights
                    .iter()
                    .zip(intercepts)
                    .map(|(w, b)| w.iter().zip(&scaled).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
                    .collect();
                argmax(&scores)
            }
        }
    }
}

impl Tree {
    fn validate(&self, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(format!("node {i} splits on unknown feature {feature}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i} has a non-finite threshold"));
                    }
                    // Children must point forward so evaluation always terminates.
                    for child in [*left, *right] {
                        if child <= i || child >= len {
                            return Err(format!("node {i} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {i} has {} class weights, expected {n_classes}",
                            value.len()
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("leaf {i} has a negative or non-finite weight"));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {i} has no weight"));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

impl StandardScaler {
    fn validate(&self) -> Result<(), String> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(format!("scaler must have {FEATURE_COUNT} means and scales"));
        }
        if self.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err("scaler has a zero or non-finite scale".into());
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err("scaler has a non-finite mean".into());
        }
        Ok(())
    }

    fn transform(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }
}

fn tree_width(trees: &[Tree]) -> usize {
    trees
        .first()
        .and_then(|t| {
            t.nodes.iter().find_map(|n| match n {
                TreeNode::Leaf { value } => Some(value.len()),
                TreeNode::Split { .. } => None,
            })
        })
        .unwrap_or(0)
}

/// Index of the largest value; the first one wins on ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
