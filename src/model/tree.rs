//! Tree model for reconstructed work item hierarchies.

use serde::Serialize;

use super::work_item::{WorkItem, WorkItemId};

/// A work item together with the children linked beneath it.
///
/// Each node exclusively owns its children. A child linked under two parents
/// is materialized once under each of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub item: WorkItem,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a childless node.
    #[must_use]
    pub fn leaf(item: WorkItem) -> Self {
        Self {
            item,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Depth of this subtree (a leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Find the first node with the given id in depth-first order.
    #[must_use]
    pub fn find(&self, id: WorkItemId) -> Option<&TreeNode> {
        if self.item.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// A parent → child edge that was not expanded because the child was already
/// open on the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleBreak {
    pub parent: WorkItemId,
    pub child: WorkItemId,
}

/// An ordered collection of root nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forest {
    pub roots: Vec<TreeNode>,

    /// Cyclic edges truncated while building, in discovery order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cycle_breaks: Vec<CycleBreak>,
}

impl Forest {
    /// Create a forest from already-built roots.
    #[must_use]
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self {
            roots,
            cycle_breaks: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across every tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(TreeNode::node_count).sum()
    }

    /// Ids of the roots, in order.
    #[must_use]
    pub fn root_ids(&self) -> Vec<WorkItemId> {
        self.roots.iter().map(|r| r.item.id).collect()
    }

    /// Find the first node with the given id across all trees.
    #[must_use]
    pub fn find(&self, id: WorkItemId) -> Option<&TreeNode> {
        self.roots.iter().find_map(|r| r.find(id))
    }
}
