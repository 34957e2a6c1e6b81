//! Merging forests fetched by independent queries.

use std::collections::HashSet;

use tracing::debug;

use crate::model::{Forest, WorkItemId};

/// Merge two forests by root id.
///
/// Roots of `primary` come first, followed by the roots of `secondary` whose
/// id has not been seen yet. When both contain the same root id the copy from
/// `primary` wins, so the result depends only on which forest is passed
/// first, never on which query finished first.
#[must_use]
pub fn merge_forests(primary: Forest, secondary: Forest) -> Forest {
    let mut seen: HashSet<WorkItemId> = HashSet::with_capacity(primary.roots.len());
    let mut merged = Forest::default();
    let mut duplicates = 0usize;

    for forest in [primary, secondary] {
        for root in forest.roots {
            if seen.insert(root.item.id) {
                merged.roots.push(root);
            } else {
                duplicates += 1;
            }
        }
        merged.cycle_breaks.extend(forest.cycle_breaks);
    }

    debug!(roots = merged.roots.len(), duplicates, "Merged forests");
    merged
}
