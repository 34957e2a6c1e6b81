//! Work item query service.
//!
//! Fetching is a two-step pipeline against the tracking service:
//!
//! ```text
//! WIQL links query ──▶ LinkPairs ──▶ ids ──▶ batch detail fetch ──▶ WorkItems
//!                          │                                           │
//!                          └──────────────▶ build_forest ◀─────────────┘
//! ```
//!
//! [`WorkItemService`] abstracts the two HTTP calls so the pipeline in
//! [`fetch_forest`] can be exercised without a server.

mod azure;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;
pub mod wiql;

pub use azure::{AzureDevOpsService, MAX_BATCH_SIZE};
pub use wiql::Period;

use std::collections::HashSet;
use std::future::Future;

use tracing::info;

use crate::error::Result;
use crate::hierarchy::build_forest;
use crate::model::{Forest, LinkPair, WorkItem, WorkItemId};

/// Trait for work item backends.
///
/// Methods return `impl Future`, so implementations can be plain `async fn`s.
pub trait WorkItemService: Send + Sync {
    /// Run a WIQL links query and return its edges in response order.
    fn query_links(&self, wiql: &str) -> impl Future<Output = Result<Vec<LinkPair>>> + Send;

    /// Fetch full records for the given ids.
    ///
    /// Ids the service does not return are simply absent from the result.
    fn fetch_items(&self, ids: &[WorkItemId]) -> impl Future<Output = Result<Vec<WorkItem>>> + Send;
}

/// Every id referenced by the links, in first-seen order.
#[must_use]
pub fn referenced_ids(links: &[LinkPair]) -> Vec<WorkItemId> {
    let mut seen = HashSet::new();
    links
        .iter()
        .flat_map(|l| [l.parent, l.child])
        .flatten()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Run a links query and build the resulting forest.
///
/// Returns an empty forest without a detail fetch when the query matched
/// nothing.
pub async fn fetch_forest<S: WorkItemService>(service: &S, wiql: &str) -> Result<Forest> {
    let links = service.query_links(wiql).await?;
    let ids = referenced_ids(&links);

    if ids.is_empty() {
        info!("Query matched no work items");
        return Ok(Forest::default());
    }

    let items = service.fetch_items(&ids).await?;
    info!(links = links.len(), items = items.len(), "Fetched work items");

    Ok(build_forest(items, &links))
}

#[cfg(test)]
mod tests {
    use super::mock::MockService;
    use super::*;

    #[test]
    fn test_referenced_ids_first_seen_order() {
        let links = [
            LinkPair::top_level(3),
            LinkPair::new(3, 1),
            LinkPair::new(3, 2),
            LinkPair {
                parent: Some(1),
                child: None,
            },
            LinkPair::new(4, 1),
        ];

        assert_eq!(referenced_ids(&links), vec![3, 1, 2, 4]);
    }

    #[tokio::test]
    async fn test_fetch_forest_builds_tree() {
        let service = MockService::default()
            .with_query(
                "q",
                vec![LinkPair::top_level(1), LinkPair::new(1, 2), LinkPair::new(1, 3)],
            )
            .with_items(vec![
                WorkItem::new(1, "Feature", "Feature"),
                WorkItem::new(2, "Task A", "Task").with_completed_work(2.0),
                WorkItem::new(3, "Task B", "Task").with_completed_work(1.0),
            ]);

        let forest = fetch_forest(&service, "q").await.unwrap();

        assert_eq!(forest.root_ids(), vec![1]);
        assert_eq!(forest.roots[0].children.len(), 2);
        assert_eq!(*service.fetched.lock().unwrap(), vec![vec![1, 2, 3]]);
    }

    #[tokio::test]
    async fn test_fetch_forest_skips_detail_fetch_when_empty() {
        let service = MockService::default();

        let forest = fetch_forest(&service, "nothing").await.unwrap();

        assert!(forest.is_empty());
        assert!(service.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_forest_tolerates_missing_parent_records() {
        // The parent is outside the project and never comes back from the
        // detail fetch; its task must still show up as a root.
        let service = MockService::default()
            .with_query("q", vec![LinkPair::new(900, 5)])
            .with_items(vec![WorkItem::new(5, "Orphan", "Task")]);

        let forest = fetch_forest(&service, "q").await.unwrap();

        assert_eq!(forest.root_ids(), vec![5]);
    }

    #[tokio::test]
    async fn test_fetch_forest_propagates_service_errors() {
        let mut service = MockService::default().with_query("q", vec![LinkPair::top_level(1)]);
        service.fail_fetch = true;

        let err = fetch_forest(&service, "q").await.unwrap_err();

        assert_eq!(err.exit_code(), 5);
    }
}
