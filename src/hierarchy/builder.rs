//! Forest reconstruction from flat link pairs.
//!
//! The links query returns edges and the detail fetch returns records; neither
//! is guaranteed to be consistent with the other. Building therefore never
//! fails: dangling edges are dropped, and cyclic edges are cut at the point
//! where they would re-enter the current path.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::model::{CycleBreak, Forest, LinkPair, TreeNode, WorkItem, WorkItemId};

/// Build a forest from work item records and hierarchy links.
///
/// Roots are the items that never appear as the child of a link with a
/// parent, in item order. When no such item exists every item becomes a root,
/// so nothing fetched is ever dropped from the output. An empty link set
/// yields a flat forest.
///
/// Items sharing an id are collapsed: the later record wins and keeps the
/// position of the first.
///
/// Every edge below a node is expanded, so output grows with the number of
/// simple paths rather than the number of items. Densely cyclic input is the
/// worst case: when all items link to each other in both directions the node
/// count grows factorially (4 items give 196, 9 give several million).
#[must_use]
pub fn build_forest(items: Vec<WorkItem>, links: &[LinkPair]) -> Forest {
    let index = ItemIndex::new(items);

    if index.is_empty() {
        return Forest::default();
    }

    if links.is_empty() {
        debug!(items = index.len(), "No hierarchy links, building flat forest");
        return Forest::new(index.items.into_iter().map(TreeNode::leaf).collect());
    }

    let children = children_lookup(&index, links);

    // Parents outside the fetched set still count: the child is not a root.
    let has_parent: HashSet<WorkItemId> = links
        .iter()
        .filter_map(LinkPair::edge)
        .map(|(_, child)| child)
        .collect();

    let mut root_items: Vec<&WorkItem> = index
        .items
        .iter()
        .filter(|item| !has_parent.contains(&item.id))
        .collect();

    if root_items.is_empty() {
        warn!(
            items = index.len(),
            "Every work item has a parent, treating all items as roots"
        );
        root_items = index.items.iter().collect();
    }

    let mut assembler = Assembler {
        index: &index,
        children: &children,
        path: HashSet::new(),
        cycle_breaks: Vec::new(),
    };

    let roots = root_items
        .into_iter()
        .map(|item| assembler.materialize(item))
        .collect();

    let cycle_breaks = assembler.cycle_breaks;
    if !cycle_breaks.is_empty() {
        warn!(
            count = cycle_breaks.len(),
            "Cycles in work item links, truncated the affected branches"
        );
    }

    Forest { roots, cycle_breaks }
}

/// Work items in fetch order, addressable by id.
struct ItemIndex {
    items: Vec<WorkItem>,
    positions: HashMap<WorkItemId, usize>,
}

impl ItemIndex {
    fn new(records: Vec<WorkItem>) -> Self {
        let mut items: Vec<WorkItem> = Vec::with_capacity(records.len());
        let mut positions = HashMap::with_capacity(records.len());

        for item in records {
            if let Some(&pos) = positions.get(&item.id) {
                items[pos] = item;
            } else {
                positions.insert(item.id, items.len());
                items.push(item);
            }
        }

        Self { items, positions }
    }

    fn get(&self, id: WorkItemId) -> Option<&WorkItem> {
        self.positions.get(&id).map(|&pos| &self.items[pos])
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Map every fetched id to its child ids, in link order.
fn children_lookup(index: &ItemIndex, links: &[LinkPair]) -> HashMap<WorkItemId, Vec<WorkItemId>> {
    let mut lookup: HashMap<WorkItemId, Vec<WorkItemId>> = index
        .items
        .iter()
        .map(|item| (item.id, Vec::new()))
        .collect();

    let mut dropped = 0usize;
    for link in links {
        match link.edge() {
            Some((parent, child)) => match lookup.get_mut(&parent) {
                Some(kids) => kids.push(child),
                None => {
                    debug!(parent, child, "Dropping link from unfetched parent");
                    dropped += 1;
                }
            },
            // Top-level rows of a links query have no source.
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, total = links.len(), "Skipped links without a known parent");
    }

    lookup
}

/// Depth-first materialization with path tracking.
struct Assembler<'a> {
    index: &'a ItemIndex,
    children: &'a HashMap<WorkItemId, Vec<WorkItemId>>,
    /// Ids currently open between the root and the node being built.
    path: HashSet<WorkItemId>,
    cycle_breaks: Vec<CycleBreak>,
}

impl Assembler<'_> {
    fn materialize(&mut self, item: &WorkItem) -> TreeNode {
        let index = self.index;
        let children = self.children;
        let id = item.id;

        let mut node = TreeNode::leaf(item.clone());
        self.path.insert(id);

        for &child_id in children.get(&id).map_or(&[][..], Vec::as_slice) {
            let Some(child) = index.get(child_id) else {
                debug!(parent = id, child = child_id, "Skipping link to unfetched child");
                continue;
            };

            if self.path.contains(&child_id) {
                debug!(parent = id, child = child_id, "Cycle in work item links, truncating branch");
                self.cycle_breaks.push(CycleBreak {
                    parent: id,
                    child: child_id,
                });
                node.children.push(TreeNode::leaf(child.clone()));
                continue;
            }

            node.children.push(self.materialize(child));
        }

        self.path.remove(&id);
        node
    }
}
