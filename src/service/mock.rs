//! In-memory [`WorkItemService`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::WorkItemService;
use crate::error::{Error, Result};
use crate::model::{LinkPair, WorkItem, WorkItemId};

/// Returns canned links per query text and filters canned records by id.
#[derive(Default)]
pub struct MockService {
    pub links: HashMap<String, Vec<LinkPair>>,
    pub items: Vec<WorkItem>,
    /// Id batches passed to `fetch_items`, in call order.
    pub fetched: Mutex<Vec<Vec<WorkItemId>>>,
    pub fail_fetch: bool,
}

impl MockService {
    pub fn with_query(mut self, wiql: impl Into<String>, links: Vec<LinkPair>) -> Self {
        self.links.insert(wiql.into(), links);
        self
    }

    pub fn with_items(mut self, items: Vec<WorkItem>) -> Self {
        self.items.extend(items);
        self
    }
}

impl WorkItemService for MockService {
    async fn query_links(&self, wiql: &str) -> Result<Vec<LinkPair>> {
        Ok(self.links.get(wiql).cloned().unwrap_or_default())
    }

    async fn fetch_items(&self, ids: &[WorkItemId]) -> Result<Vec<WorkItem>> {
        self.fetched.lock().unwrap().push(ids.to_vec());
        if self.fail_fetch {
            return Err(Error::Api {
                operation: "work item details".to_string(),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self
            .items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect())
    }
}
