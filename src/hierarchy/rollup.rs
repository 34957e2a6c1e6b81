//! Completed-work rollups.
//!
//! Only leaf-kind items carry effort of their own. Parents get the sum of the
//! contributing leaves beneath them, or nothing at all when that sum is zero so
//! they render blank rather than as `0`.

use tracing::debug;

use crate::model::{Forest, TreeNode};

/// Item kind whose completed work is summed by default.
pub const DEFAULT_LEAF_KIND: &str = "Task";

/// Effort a single node contributes on its own.
fn contribution(node: &TreeNode, leaf_kind: &str) -> f64 {
    if node.item.is_kind(leaf_kind) {
        node.item.completed_work.unwrap_or(0.0)
    } else {
        0.0
    }
}

/// Sum the completed work of every `leaf_kind` node in the forest.
///
/// Every node is visited, not only leaves, so a leaf-kind item with children
/// still counts its own value.
#[must_use]
pub fn total_effort(forest: &Forest, leaf_kind: &str) -> f64 {
    fn walk(node: &TreeNode, leaf_kind: &str) -> f64 {
        contribution(node, leaf_kind)
            + node
                .children
                .iter()
                .map(|c| walk(c, leaf_kind))
                .sum::<f64>()
    }

    forest.roots.iter().map(|r| walk(r, leaf_kind)).sum()
}

/// Roll completed work up through the forest and return the grand total.
///
/// The total is taken from the original values before any parent is
/// overwritten. Each node with children then receives the sum of its
/// subtree's contributing leaves, or `None` when that sum is not positive.
/// Childless nodes are left untouched whatever their kind.
pub fn compute_rollups(forest: &mut Forest, leaf_kind: &str) -> f64 {
    let total = total_effort(forest, leaf_kind);

    for root in &mut forest.roots {
        roll_up(root, leaf_kind);
    }

    debug!(total, leaf_kind, roots = forest.roots.len(), "Computed rollups");
    total
}

/// Overwrite a subtree's parents with their rolled-up sums.
///
/// Returns the subtree sum.
pub fn roll_up(node: &mut TreeNode, leaf_kind: &str) -> f64 {
    if node.is_leaf() {
        return contribution(node, leaf_kind);
    }

    let sum: f64 = node
        .children
        .iter_mut()
        .map(|c| roll_up(c, leaf_kind))
        .sum();

    node.item.completed_work = (sum > 0.0).then_some(sum);
    sum
}
