//! Work item model.
//!
//! Work items are the flat records returned by the detail fetch. Their kind and
//! state are free text: new kinds added on the server must never break parsing.

use serde::{Deserialize, Serialize};

/// Work item identifier as assigned by the tracking service.
pub type WorkItemId = u32;

/// A single work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier within a fetch
    pub id: WorkItemId,

    /// Display title
    pub title: String,

    /// Workflow state (e.g. "Done", "Active", "In Progress")
    pub state: String,

    /// Display name of the assignee, empty when unassigned
    #[serde(default)]
    pub assigned_to: String,

    /// Work item type (e.g. "Task", "Bug", "Feature")
    #[serde(rename = "type")]
    pub kind: String,

    /// Completed work in hours.
    ///
    /// Only meaningful on leaf-kind items until a rollup overwrites it on
    /// parents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_work: Option<f64>,
}

impl WorkItem {
    /// Create a work item with empty state and assignee.
    pub fn new(id: WorkItemId, title: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            state: String::new(),
            assigned_to: String::new(),
            kind: kind.into(),
            completed_work: None,
        }
    }

    /// Set the workflow state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Set the completed work value.
    #[must_use]
    pub fn with_completed_work(mut self, hours: f64) -> Self {
        self.completed_work = Some(hours);
        self
    }

    /// Whether this item is of the given kind.
    ///
    /// Kinds are compared exactly, matching how the service reports them.
    #[must_use]
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

/// A directed hierarchy edge from a links query.
///
/// Either end may be missing. Top-level rows of a links query carry only a
/// target, and partial rows must be tolerated rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkPair {
    pub parent: Option<WorkItemId>,
    pub child: Option<WorkItemId>,
}

impl LinkPair {
    /// A complete parent → child edge.
    #[must_use]
    pub const fn new(parent: WorkItemId, child: WorkItemId) -> Self {
        Self {
            parent: Some(parent),
            child: Some(child),
        }
    }

    /// A row with no parent, as emitted for top-level query matches.
    #[must_use]
    pub const fn top_level(child: WorkItemId) -> Self {
        Self {
            parent: None,
            child: Some(child),
        }
    }

    /// Both ends, if present.
    #[must_use]
    pub const fn edge(&self) -> Option<(WorkItemId, WorkItemId)> {
        match (self.parent, self.child) {
            (Some(parent), Some(child)) => Some((parent, child)),
            _ => None,
        }
    }
}
