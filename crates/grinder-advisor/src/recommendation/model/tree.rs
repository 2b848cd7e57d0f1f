use serde::{Deserialize, Serialize};

/// Child index marking "no child".
pub const TREE_LEAF: i64 = -1;
/// Split-feature index marking a leaf.
pub const TREE_UNDEFINED: i64 = -2;

/// Trained classification tree stored as parallel arrays indexed by node id.
///
/// Node 0 is the root. Internal nodes route a row left when
/// `row[feature] <= threshold` and right otherwise; leaves carry the class
/// distribution seen during training in `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub n_node_samples: Vec<u64>,
    pub value: Vec<Vec<f64>>,
}

/// Nodes visited for one row, root first, leaf last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionPath {
    pub nodes: Vec<usize>,
    pub leaf: usize,
}

impl DecisionTree {
    /// Checks the structural invariants inference depends on.
    pub fn validate(&self) -> Result<(), TreeError> {
        let count = self.children_left.len();
        if count == 0 {
            return Err(TreeError::Empty);
        }

        let lengths = [
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
            ("n_node_samples", self.n_node_samples.len()),
            ("value", self.value.len()),
        ];
        for (field, len) in lengths {
            if len != count {
                return Err(TreeError::LengthMismatch {
                    field,
                    expected: count,
                    found: len,
                });
            }
        }

        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    pub fn is_leaf(&self, node: usize) -> bool {
        self.feature.get(node) == Some(&TREE_UNDEFINED)
            || self.children_left.get(node) == Some(&TREE_LEAF)
    }

    pub fn split_feature(&self, node: usize) -> Option<i64> {
        self.feature.get(node).copied()
    }

    pub fn samples(&self, node: usize) -> Option<u64> {
        self.n_node_samples.get(node).copied()
    }

    /// Walks the tree for one encoded row.
    pub fn decision_path(&self, row: &[f64]) -> Result<DecisionPath, TreeError> {
        let mut node = 0usize;
        let mut nodes = Vec::new();

        loop {
            if node >= self.node_count() {
                return Err(TreeError::NodeOutOfRange { node });
            }
            // A well-formed path can never be longer than the tree itself.
            if nodes.len() >= self.node_count() {
                return Err(TreeError::Cycle { node });
            }
            nodes.push(node);

            if self.is_leaf(node) {
                return Ok(DecisionPath { nodes, leaf: node });
            }

            let feature = self.feature[node];
            let value = usize::try_from(feature)
                .ok()
                .and_then(|index| row.get(index))
                .copied()
                .ok_or(TreeError::FeatureOutOfRange { node, feature })?;

            let next = if value <= self.threshold[node] {
                self.children_left[node]
            } else {
                self.children_right[node]
            };
            node = usize::try_from(next).map_err(|_| TreeError::MissingChild { node })?;
        }
    }

    /// Class id predicted at `leaf`: the first maximum of its distribution.
    pub fn leaf_class(&self, leaf: usize) -> Result<usize, TreeError> {
        let distribution = self
            .value
            .get(leaf)
            .ok_or(TreeError::NodeOutOfRange { node: leaf })?;

        let mut best: Option<(usize, f64)> = None;
        for (class, weight) in distribution.iter().copied().enumerate() {
            if best.map_or(true, |(_, top)| weight > top) {
                best = Some((class, weight));
            }
        }

        best.map(|(class, _)| class)
            .ok_or(TreeError::NoClassDistribution { node: leaf })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("tree has no nodes")]
    Empty,
    #[error("tree array '{field}' has {found} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("node {node} is outside the tree")]
    NodeOutOfRange { node: usize },
    #[error("node {node} splits on feature {feature}, which the row does not have")]
    FeatureOutOfRange { node: usize, feature: i64 },
    #[error("internal node {node} has no child on the taken branch")]
    MissingChild { node: usize },
    #[error("walk revisited the tree past node {node}")]
    Cycle { node: usize },
    #[error("leaf {node} has an empty class distribution")]
    NoClassDistribution { node: usize },
}
