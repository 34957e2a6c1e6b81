//! Wire types for the Azure DevOps work item REST API.
//!
//! Only the fields the hierarchy needs are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

use crate::model::{LinkPair, WorkItem, WorkItemId};

/// Request body for `_apis/wit/wiql`.
#[derive(Debug, Serialize)]
pub struct WiqlRequest<'a> {
    pub query: &'a str,
}

/// Response of a WIQL links query.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiqlResponse {
    #[serde(default)]
    pub work_item_relations: Option<Vec<WorkItemRelation>>,
}

impl WiqlResponse {
    /// Link pairs in response order.
    #[must_use]
    pub fn link_pairs(&self) -> Vec<LinkPair> {
        self.work_item_relations
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(WorkItemRelation::link_pair)
            .collect()
    }
}

/// One row of a links query result.
///
/// Top-level matches have no `source`.
#[derive(Debug, Deserialize)]
pub struct WorkItemRelation {
    #[serde(default)]
    pub source: Option<WorkItemReference>,
    #[serde(default)]
    pub target: Option<WorkItemReference>,
}

impl WorkItemRelation {
    #[must_use]
    pub fn link_pair(&self) -> LinkPair {
        LinkPair {
            parent: self.source.as_ref().map(|r| r.id),
            child: self.target.as_ref().map(|r| r.id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkItemReference {
    pub id: WorkItemId,
}

/// Response of `_apis/wit/workitems?ids=...`.
///
/// With `errorPolicy=omit` ids that cannot be read come back as `null`.
#[derive(Debug, Deserialize)]
pub struct WorkItemBatch {
    #[serde(default)]
    pub value: Vec<Option<RawWorkItem>>,
}

impl WorkItemBatch {
    /// Readable items in response order.
    pub fn into_items(self) -> impl Iterator<Item = WorkItem> {
        self.value.into_iter().flatten().map(WorkItem::from)
    }
}

#[derive(Debug, Deserialize)]
pub struct RawWorkItem {
    pub id: WorkItemId,
    #[serde(default)]
    pub fields: RawFields,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawFields {
    #[serde(rename = "System.Title", default)]
    pub title: Option<String>,
    #[serde(rename = "System.State", default)]
    pub state: Option<String>,
    #[serde(rename = "System.AssignedTo", default)]
    pub assigned_to: Option<IdentityRef>,
    #[serde(rename = "System.WorkItemType", default)]
    pub work_item_type: Option<String>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.CompletedWork", default)]
    pub completed_work: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    #[serde(default)]
    pub display_name: Option<String>,
}

impl From<RawWorkItem> for WorkItem {
    fn from(raw: RawWorkItem) -> Self {
        let fields = raw.fields;
        Self {
            id: raw.id,
            title: fields.title.unwrap_or_default(),
            state: fields.state.unwrap_or_default(),
            assigned_to: fields
                .assigned_to
                .and_then(|who| who.display_name)
                .unwrap_or_default(),
            kind: fields.work_item_type.unwrap_or_default(),
            completed_work: fields.completed_work,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_links_query() {
        let json = r#"{
            "queryType": "oneHop",
            "queryResultType": "workItemLink",
            "asOf": "2024-05-01T10:00:00Z",
            "workItemRelations": [
                { "rel": null, "source": null, "target": { "id": 10, "url": "https://x/10" } },
                { "rel": "System.LinkTypes.Hierarchy-Forward",
                  "source": { "id": 10, "url": "https://x/10" },
                  "target": { "id": 11, "url": "https://x/11" } },
                { "rel": "System.LinkTypes.Hierarchy-Forward",
                  "source": { "id": 10 } }
            ]
        }"#;

        let response: WiqlResponse = serde_json::from_str(json).unwrap();

        assert_eq!(
            response.link_pairs(),
            vec![
                LinkPair::top_level(10),
                LinkPair::new(10, 11),
                LinkPair {
                    parent: Some(10),
                    child: None
                },
            ]
        );
    }

    #[test]
    fn test_parse_flat_query_has_no_links() {
        let response: WiqlResponse =
            serde_json::from_str(r#"{"queryType":"flat","workItems":[{"id":1}]}"#).unwrap();
        assert!(response.link_pairs().is_empty());
    }

    #[test]
    fn test_parse_work_items() {
        let json = r#"{
            "count": 3,
            "value": [
                null,
                { "id": 10, "rev": 3, "fields": {
                    "System.Title": "Checkout revamp",
                    "System.State": "Active",
                    "System.WorkItemType": "Feature"
                } },
                { "id": 11, "rev": 7, "fields": {
                    "System.Title": "Wire up payment form",
                    "System.State": "Done",
                    "System.WorkItemType": "Task",
                    "System.AssignedTo": { "displayName": "Sam Doe", "uniqueName": "sam@contoso.com" },
                    "Microsoft.VSTS.Scheduling.CompletedWork": 3.5
                } }
            ]
        }"#;

        let batch: WorkItemBatch = serde_json::from_str(json).unwrap();
        let items: Vec<WorkItem> = batch.into_items().collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, "Feature");
        assert_eq!(items[0].assigned_to, "");
        assert_eq!(items[0].completed_work, None);
        assert_eq!(items[1].assigned_to, "Sam Doe");
        assert_eq!(items[1].completed_work, Some(3.5));
    }

    #[test]
    fn test_integral_completed_work_parses_as_float() {
        let raw: RawWorkItem = serde_json::from_str(
            r#"{"id":1,"fields":{"System.WorkItemType":"Task","Microsoft.VSTS.Scheduling.CompletedWork":2}}"#,
        )
        .unwrap();

        assert_eq!(WorkItem::from(raw).completed_work, Some(2.0));
    }
}
