//! Azure DevOps REST implementation of [`WorkItemService`].

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{WiqlRequest, WiqlResponse, WorkItemBatch};
use super::WorkItemService;
use crate::config::AzDoConfig;
use crate::error::{Error, Result};
use crate::model::{LinkPair, WorkItem, WorkItemId};

/// REST API version used for every call.
const API_VERSION: &str = "7.0";

/// Maximum ids accepted by a single `workitems?ids=` request.
pub const MAX_BATCH_SIZE: usize = 200;

/// Azure DevOps work item service.
pub struct AzureDevOpsService {
    client: reqwest::Client,
    config: AzDoConfig,
}

impl AzureDevOpsService {
    /// Create a service for the configured organization and project.
    pub fn new(config: AzDoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("azdo/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &AzDoConfig {
        &self.config
    }

    fn wiql_url(&self) -> String {
        self.config
            .api_url(&format!("_apis/wit/wiql?api-version={API_VERSION}"))
    }

    fn work_items_url(&self, ids: &[WorkItemId]) -> String {
        let ids = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.config.api_url(&format!(
            "_apis/wit/workitems?ids={ids}&errorPolicy=omit&api-version={API_VERSION}"
        ))
    }

    /// Detail URLs covering `ids` in order, at most [`MAX_BATCH_SIZE`] ids each.
    fn batch_urls(&self, ids: &[WorkItemId]) -> Vec<String> {
        ids.chunks(MAX_BATCH_SIZE)
            .map(|chunk| self.work_items_url(chunk))
            .collect()
    }

    /// PAT auth: basic auth with an empty user name.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth("", Some(&self.config.personal_access_token))
    }

    async fn decode<T: DeserializeOwned>(operation: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            // A failed call is still reported by its status.
            Err(_) if !is_accepted(status) => String::new(),
            Err(e) => return Err(e.into()),
        };

        parse_response(operation, status, &body)
    }
}

/// A rejected token is answered with `203` and an HTML sign-in page rather
/// than `401`, so that status does not count as success.
fn is_accepted(status: StatusCode) -> bool {
    status.is_success() && status != StatusCode::NON_AUTHORITATIVE_INFORMATION
}

/// Check the status and decode the body.
fn parse_response<T: DeserializeOwned>(operation: &str, status: StatusCode, body: &str) -> Result<T> {
    if !is_accepted(status) {
        return Err(Error::Api {
            operation: operation.to_string(),
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    Ok(serde_json::from_str(body)?)
}

impl WorkItemService for AzureDevOpsService {
    async fn query_links(&self, wiql: &str) -> Result<Vec<LinkPair>> {
        debug!(query = wiql, "Running WIQL query");

        let response = self
            .authorize(self.client.post(self.wiql_url()))
            .json(&WiqlRequest { query: wiql })
            .send()
            .await?;

        let result: WiqlResponse = Self::decode("WIQL query", response).await?;
        Ok(result.link_pairs())
    }

    async fn fetch_items(&self, ids: &[WorkItemId]) -> Result<Vec<WorkItem>> {
        let mut items = Vec::with_capacity(ids.len());

        let urls = self.batch_urls(ids);
        let batches = urls.len();

        for (batch_no, url) in urls.into_iter().enumerate() {
            debug!(batch = batch_no + 1, batches, "Fetching work item details");

            let response = self.authorize(self.client.get(url)).send().await?;

            let batch: WorkItemBatch = Self::decode("work item details", response).await?;
            items.extend(batch.into_items());
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, ConfigFile};

    fn service() -> AzureDevOpsService {
        let config = resolve(
            |key| {
                Some(
                    match key {
                        "AZDO_ORG" => "contoso",
                        "AZDO_PROJECT" => "Fabrikam",
                        "AZDO_PAT" => "secret",
                        "AZDO_USER_EMAIL" => "dev@contoso.com",
                        _ => return None,
                    }
                    .to_string(),
                )
            },
            &ConfigFile::default(),
        )
        .unwrap();
        AzureDevOpsService::new(config).unwrap()
    }

    #[test]
    fn test_urls() {
        let service = service();

        assert_eq!(
            service.wiql_url(),
            "https://dev.azure.com/contoso/Fabrikam/_apis/wit/wiql?api-version=7.0"
        );
        assert_eq!(
            service.work_items_url(&[1, 22, 333]),
            "https://dev.azure.com/contoso/Fabrikam/_apis/wit/workitems?ids=1,22,333&errorPolicy=omit&api-version=7.0"
        );
    }

    fn ids_in(url: &str) -> Vec<WorkItemId> {
        let start = url.find("ids=").unwrap() + "ids=".len();
        let end = start + url[start..].find('&').unwrap();
        url[start..end].split(',').map(|id| id.parse().unwrap()).collect()
    }

    #[test]
    fn test_batch_urls_respect_limit_and_order() {
        let service = service();

        for (count, expected_batches) in [(0, 0), (200, 1), (201, 2), (401, 3)] {
            let ids: Vec<WorkItemId> = (1..=count).collect();
            let urls = service.batch_urls(&ids);

            assert_eq!(urls.len(), expected_batches, "{count} ids");
            let batches: Vec<Vec<WorkItemId>> = urls.iter().map(|u| ids_in(u)).collect();
            assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= MAX_BATCH_SIZE));
            assert_eq!(batches.concat(), ids);
        }
    }

    #[test]
    fn test_sign_in_page_is_an_api_error() {
        let err = parse_response::<WiqlResponse>(
            "WIQL query",
            StatusCode::NON_AUTHORITATIVE_INFORMATION,
            "<html>Sign in</html>",
        )
        .unwrap_err();

        match err {
            Error::Api { operation, status, body } => {
                assert_eq!(operation, "WIQL query");
                assert_eq!(status, 203);
                assert_eq!(body, "<html>Sign in</html>");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failed_status_keeps_body() {
        let err = parse_response::<WorkItemBatch>(
            "work item details",
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"TF400898: An Internal Error Occurred"}"#,
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 5);
        match err {
            Error::Api { status, body, .. } => {
                assert_eq!(status, 500);
                assert!(body.contains("TF400898"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_success_decodes_body() {
        let response: WiqlResponse = parse_response(
            "WIQL query",
            StatusCode::OK,
            r#"{"workItemRelations":[{"target":{"id":7}},{"source":{"id":7},"target":{"id":8}}]}"#,
        )
        .unwrap();

        assert_eq!(
            response.link_pairs(),
            vec![LinkPair::top_level(7), LinkPair::new(7, 8)]
        );

        let err = parse_response::<WiqlResponse>("WIQL query", StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_authorize_sets_basic_header() {
        let service = service();
        let request = service
            .authorize(service.client.get(service.wiql_url()))
            .build()
            .unwrap();

        let header = request.headers()["authorization"].to_str().unwrap();
        // base64(":secret")
        assert_eq!(header, "Basic OnNlY3JldA==");
    }
}
