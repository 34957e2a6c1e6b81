//! Data models for azdo.
//!
//! - [`WorkItem`] and [`LinkPair`]: flat records returned by the query service
//! - [`TreeNode`] and [`Forest`]: the reconstructed hierarchy

pub mod tree;
pub mod work_item;

pub use tree::{CycleBreak, Forest, TreeNode};
pub use work_item::{LinkPair, WorkItem, WorkItemId};
