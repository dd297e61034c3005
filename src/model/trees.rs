//! gbtree booster inference.
//!
//! The prediction is `base_score` plus the leaf value reached in every tree.
//! At a split node a missing (NaN) value follows `default_left`; otherwise
//! `value < threshold` goes left.

use serde::{Deserialize, Serialize};

use super::{ModelError, RegressionModel};
use crate::types::{FeatureVector, FEATURE_COUNT};

/// One node of a regression tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        /// Feature index in schema order
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_true")]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Check node references so evaluation can never loop or index out of range.
    ///
    /// Children must point strictly forward, which rules out cycles.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } = node
            {
                if *feature >= FEATURE_COUNT {
                    return Err(format!("node {idx}: feature index {feature} out of range"));
                }
                if threshold.is_nan() {
                    return Err(format!("node {idx}: threshold is NaN"));
                }
                for child in [left, right] {
                    if *child <= idx || *child >= self.nodes.len() {
                        return Err(format!("node {idx}: invalid child index {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_value(&self, values: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { leaf }) => return Ok(*leaf),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                }) => {
                    let value = values.get(*feature).copied().ok_or_else(|| {
                        ModelError::Evaluation(format!("feature index {feature} out of range"))
                    })?;
                    let go_left = if value.is_nan() {
                        *default_left
                    } else {
                        value < *threshold
                    };
                    let next = if go_left { *left } else { *right };
                    if next <= idx {
                        return Err(ModelError::Evaluation(format!(
                            "node {idx} points backwards to {next}"
                        )));
                    }
                    idx = next;
                }
                None => {
                    return Err(ModelError::Evaluation(format!("node {idx} does not exist")));
                }
            }
        }
    }
}

/// Additive ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), String> {
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl RegressionModel for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let values = features.to_array();
        let mut out = self.base_score;
        for tree in &self.trees {
            out += tree.leaf_value(&values)?;
        }
        if out.is_finite() {
            Ok(out)
        } else {
            Err(ModelError::NonFinite(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(avg_days: f64) -> FeatureVector {
        FeatureVector {
            critic_score_filled: 80.0,
            has_critic_score: 0.0,
            release_year: 2024.0,
            release_month: 1.0,
            publisher_count: 1.0,
            developer_count: 1.0,
            publisher_sample_count: 5.0,
            avg_days_to_store: avg_days,
            publisher_speed_score: 0.5,
            publisher_code: 0.0,
        }
    }

    /// Splits on avg_days_to_epic at 500: left leaf 100, right leaf 300.
    fn stump(default_left: bool) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 7,
                    threshold: 500.0,
                    left: 1,
                    right: 2,
                    default_left,
                },
                TreeNode::Leaf { leaf: 100.0 },
                TreeNode::Leaf { leaf: 300.0 },
            ],
        }
    }

    #[test]
    fn test_split_direction() {
        let model = TreeEnsemble {
            base_score: 50.0,
            trees: vec![stump(true)],
        };
        assert_eq!(model.predict(&vector(400.0)).unwrap(), 150.0);
        assert_eq!(model.predict(&vector(500.0)).unwrap(), 350.0);
    }

    #[test]
    fn test_missing_value_follows_default() {
        let left = TreeEnsemble {
            base_score: 0.0,
            trees: vec![stump(true)],
        };
        let right = TreeEnsemble {
            base_score: 0.0,
            trees: vec![stump(false)],
        };
        assert_eq!(left.predict(&vector(f64::NAN)).unwrap(), 100.0);
        assert_eq!(right.predict(&vector(f64::NAN)).unwrap(), 300.0);
    }

    #[test]
    fn test_trees_are_summed() {
        let model = TreeEnsemble {
            base_score: 0.0,
            trees: vec![stump(true), stump(true)],
        };
        assert_eq!(model.predict(&vector(900.0)).unwrap(), 600.0);
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let tree = RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 0,
                    right: 1,
                    default_left: true,
                },
                TreeNode::Leaf { leaf: 1.0 },
            ],
        };
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_feature() {
        let tree = RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: FEATURE_COUNT,
                    threshold: 1.0,
                    left: 1,
                    right: 2,
                    default_left: true,
                },
                TreeNode::Leaf { leaf: 1.0 },
                TreeNode::Leaf { leaf: 2.0 },
            ],
        };
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_node_json_shapes() {
        let tree: RegressionTree = serde_json::from_str(
            r#"{"nodes":[{"feature":7,"threshold":500.0,"left":1,"right":2},{"leaf":1.5},{"leaf":2.5}]}"#,
        )
        .unwrap();
        assert!(tree.validate().is_ok());
        assert!(matches!(
            tree.nodes[0],
            TreeNode::Split {
                default_left: true,
                ..
            }
        ));
    }
}
