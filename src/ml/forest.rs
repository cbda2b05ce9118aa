//! Decision-forest artifacts (random forest classifier/regressor).
//!
//! Trees are stored as flat node arrays. A sample goes to the left child
//! when `x[feature] <= threshold`. Children always sit after their parent,
//! so every walk terminates.

use serde::{Deserialize, Serialize};

use super::dense::argmax;
use super::model::Model;
use crate::error::{GateError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForestTask {
    /// Leaves hold per-class weights; output is the winning class label.
    Classifier { classes: Vec<i64> },
    /// Leaves hold a single value; output is the mean over trees.
    Regressor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if x[*feature] <= *threshold { *left } else { *right },
                TreeNode::Leaf { value } => return value,
            }
        }
    }

    fn validate(&self, n_features: usize, leaf_len: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let n = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {idx} splits on feature {feature}, only {n_features} features"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has non-finite threshold"));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= n {
                            return Err(format!("node {idx} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != leaf_len {
                        return Err(format!(
                            "leaf {idx} has {} values, expected {leaf_len}",
                            value.len()
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite()) {
                        return Err(format!("leaf {idx} has non-finite values"));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionForest {
    pub n_features: usize,
    pub task: ForestTask,
    pub trees: Vec<DecisionTree>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl DecisionForest {
    pub fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(GateError::Validation("n_features must be > 0".to_string()));
        }
        if self.trees.is_empty() {
            return Err(GateError::Validation("forest has no trees".to_string()));
        }
        let leaf_len = match &self.task {
            ForestTask::Classifier { classes } if classes.is_empty() => {
                return Err(GateError::Validation("classifier has no classes".to_string()));
            }
            ForestTask::Classifier { classes } => classes.len(),
            ForestTask::Regressor => 1,
        };
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, leaf_len)
                .map_err(|e| GateError::Validation(format!("tree[{t}]: {e}")))?;
            if matches!(self.task, ForestTask::Classifier { .. }) {
                let bad_leaf = tree.nodes.iter().any(|node| match node {
                    TreeNode::Leaf { value } => {
                        value.iter().any(|v| *v < 0.0) || value.iter().sum::<f64>() <= 0.0
                    }
                    TreeNode::Split { .. } => false,
                });
                if bad_leaf {
                    return Err(GateError::Validation(format!(
                        "tree[{t}]: classifier leaves need non-negative weights with a positive sum"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Model for DecisionForest {
    fn kind(&self) -> &'static str {
        match self.task {
            ForestTask::Classifier { .. } => "random_forest_classifier",
            ForestTask::Regressor => "random_forest_regressor",
        }
    }

    fn input_dim(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            return Err(GateError::Validation(format!(
                "DecisionForest input dim mismatch: got {}, expected {}",
                features.len(),
                self.n_features
            )));
        }

        match &self.task {
            ForestTask::Classifier { classes } => {
                let mut proba = vec![0.0_f64; classes.len()];
                for tree in &self.trees {
                    let leaf = tree.leaf(features);
                    let total: f64 = leaf.iter().sum();
                    for (p, w) in proba.iter_mut().zip(leaf) {
                        *p += w / total;
                    }
                }
                Ok(classes[argmax(&proba)] as f64)
            }
            ForestTask::Regressor => {
                let sum: f64 = self.trees.iter().map(|t| t.leaf(features)[0]).sum();
                Ok(sum / self.trees.len() as f64)
            }
        }
    }
}
