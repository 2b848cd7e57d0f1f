use super::tree::DecisionTree;

/// Depth of every node, computed once per tree.
///
/// Built from a single scan of the child arrays into a parent table, then
/// filled iteratively so deep trees never recurse. Nodes that cannot be
/// connected back to the root have no depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDepths {
    depths: Vec<Option<usize>>,
}

impl NodeDepths {
    pub fn from_tree(tree: &DecisionTree) -> Self {
        let count = tree.node_count();
        let mut parents: Vec<Option<usize>> = vec![None; count];

        let children = tree.children_left.iter().zip(&tree.children_right);
        for (parent, (&left, &right)) in children.enumerate() {
            for child in [left, right] {
                if let Ok(child) = usize::try_from(child) {
                    // Root has no parent; the first claim on a child wins.
                    if child != 0 && child < count && parents[child].is_none() {
                        parents[child] = Some(parent);
                    }
                }
            }
        }

        let mut depths: Vec<Option<usize>> = vec![None; count];
        if count > 0 {
            depths[0] = Some(0);
        }

        let mut chain = Vec::new();
        for start in 0..count {
            if depths[start].is_some() {
                continue;
            }

            chain.clear();
            let mut node = start;
            let base = loop {
                if let Some(depth) = depths[node] {
                    break Some(depth);
                }
                if chain.len() > count {
                    break None;
                }
                chain.push(node);
                match parents[node] {
                    Some(parent) => node = parent,
                    None => break None,
                }
            };

            if let Some(base) = base {
                for (offset, &node) in chain.iter().rev().enumerate() {
                    depths[node] = Some(base + offset + 1);
                }
            }
        }

        Self { depths }
    }

    pub fn depth(&self, node: usize) -> Option<usize> {
        self.depths.get(node).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::model::tree::{TREE_LEAF, TREE_UNDEFINED};

    fn tree(children_left: Vec<i64>, children_right: Vec<i64>) -> DecisionTree {
        let count = children_left.len();
        DecisionTree {
            feature: children_left
                .iter()
                .map(|&left| if left == TREE_LEAF { TREE_UNDEFINED } else { 0 })
                .collect(),
            children_left,
            children_right,
            threshold: vec![0.5; count],
            n_node_samples: vec![1; count],
            value: vec![vec![1.0]; count],
        }
    }

    #[test]
    fn depths_follow_parent_chain_regardless_of_ids() {
        // Children listed before their parents in id order.
        let tree = tree(
            vec![3, TREE_LEAF, TREE_LEAF, 2, TREE_LEAF],
            vec![4, TREE_LEAF, TREE_LEAF, 1, TREE_LEAF],
        );
        let depths = NodeDepths::from_tree(&tree);
        assert_eq!(depths.depth(0), Some(0));
        assert_eq!(depths.depth(3), Some(1));
        assert_eq!(depths.depth(4), Some(1));
        assert_eq!(depths.depth(1), Some(2));
        assert_eq!(depths.depth(2), Some(2));
    }

    #[test]
    fn orphaned_nodes_have_no_depth() {
        let tree = tree(
            vec![1, TREE_LEAF, 3, TREE_LEAF],
            vec![TREE_LEAF, TREE_LEAF, TREE_LEAF, TREE_LEAF],
        );
        let depths = NodeDepths::from_tree(&tree);
        assert_eq!(depths.depth(1), Some(1));
        assert_eq!(depths.depth(2), None);
        assert_eq!(depths.depth(3), None);
        assert_eq!(depths.depth(9), None);
    }

    #[test]
    fn parent_cycles_terminate() {
        let tree = tree(vec![TREE_LEAF, 2, 1], vec![TREE_LEAF, TREE_LEAF, TREE_LEAF]);
        let depths = NodeDepths::from_tree(&tree);
        assert_eq!(depths.depth(0), Some(0));
        assert_eq!(depths.depth(1), None);
        assert_eq!(depths.depth(2), None);
    }

    #[test]
    fn deep_chains_do_not_recurse() {
        let count = 50_000;
        let mut left: Vec<i64> = (1..count as i64).collect();
        left.push(TREE_LEAF);
        let depths = NodeDepths::from_tree(&tree(left, vec![TREE_LEAF; count]));
        assert_eq!(depths.depth(count - 1), Some(count - 1));
    }
}
