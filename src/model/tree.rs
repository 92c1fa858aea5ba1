//! Binary regression tree
//!
//! Nodes are stored flat in a single vector with the root at index 0.
//! A split routes `x[feature] <= threshold` to the left child, otherwise
//! to the right. Structure is checked once at artifact load time, so
//! traversal itself stays branch-and-index only.

use serde::{Deserialize, Serialize};

/// One node of a regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeNode {
    /// Internal decision on `feature` at `threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node carrying this tree's contribution
    Leaf { value: f64 },
}

/// A fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        RegressionTree { nodes }
    }

    /// Degenerate single-leaf tree
    pub fn leaf(value: f64) -> Self {
        RegressionTree {
            nodes: vec![TreeNode::Leaf { value }],
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk from the root to a leaf for the given feature vector.
    ///
    /// The vector must be at least as long as the feature count the tree
    /// was validated against.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Structural check run at artifact load time.
    ///
    /// Child indices must point forward (no cycles), stay in bounds, every
    /// split must reference a feature below `n_features` with a finite
    /// threshold, and every leaf value must be finite.
    pub fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {} has non-finite leaf value", i));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but only {} features exist",
                            i, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", i));
                    }
                    for &child in &[*left, *right] {
                        if child >= self.nodes.len() {
                            return Err(format!(
                                "node {} points at child {} beyond {} nodes",
                                i,
                                child,
                                self.nodes.len()
                            ));
                        }
                        if child <= i {
                            return Err(format!("node {} points backwards at child {}", i, child));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree::new(vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: low },
            TreeNode::Leaf { value: high },
        ])
    }

    #[test]
    fn test_leaf_tree() {
        let tree = RegressionTree::leaf(3.5);
        assert_eq!(tree.predict(&[0.0; 8]), 3.5);
        assert!(tree.validate(8).is_ok());
    }

    #[test]
    fn test_split_routing() {
        let tree = stump(0, 350.0, -1.0, 1.0);
        assert_eq!(tree.predict(&[200.0]), -1.0);
        assert_eq!(tree.predict(&[500.0]), 1.0);
    }

    #[test]
    fn test_boundary_goes_left() {
        let tree = stump(0, 350.0, -1.0, 1.0);
        assert_eq!(tree.predict(&[350.0]), -1.0);
    }

    #[test]
    fn test_validate_rejects_bad_feature() {
        let tree = stump(9, 1.0, 0.0, 0.0);
        assert!(tree.validate(8).is_err());
        assert!(tree.validate(10).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_child() {
        let tree = RegressionTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 1,
                right: 7,
            },
            TreeNode::Leaf { value: 0.0 },
        ]);
        assert!(tree.validate(8).is_err());
    }

    #[test]
    fn test_validate_rejects_backward_edge() {
        let tree = RegressionTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { value: 0.0 },
        ]);
        assert!(tree.validate(8).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_tree() {
        let tree = RegressionTree::new(Vec::new());
        assert!(tree.validate(8).is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_leaf() {
        assert!(RegressionTree::leaf(f64::NAN).validate(8).is_err());
        assert!(RegressionTree::leaf(f64::INFINITY).validate(8).is_err());
        assert!(RegressionTree::leaf(1.5).validate(8).is_ok());
    }
}
