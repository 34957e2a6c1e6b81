//! Work item hierarchy reconstruction and rollups.
//!
//! # Pipeline
//!
//! ```text
//! links + items ──▶ build_forest ──▶ Forest ──▶ compute_rollups ──▶ total
//!                                      │
//!                 other Forest ──▶ merge_forests
//! ```
//!
//! Everything here is synchronous and allocation-only. Malformed link data
//! degrades to flatter trees instead of failing.

mod builder;
mod merge;
mod rollup;

pub use builder::build_forest;
pub use merge::merge_forests;
pub use rollup::{compute_rollups, roll_up, total_effort, DEFAULT_LEAF_KIND};
