//! List command implementations.
//!
//! Every list command runs the same pipeline: resolve config, fetch one or two
//! forests, roll completed work up, then render or print JSON.

use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::cli::{PeriodArgs, RollupArgs};
use crate::config;
use crate::error::{Error, Result};
use crate::hierarchy::{compute_rollups, merge_forests};
use crate::model::Forest;
use crate::render::{print_forest, RenderOptions};
use crate::service::wiql::{active_query, completed_query};
use crate::service::{fetch_forest, AzureDevOpsService, Period, WorkItemService};

/// Which work items a list command shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Completed(Period),
    Active,
    /// Completed and active, merged with completed copies winning.
    All(Period),
}

impl ListScope {
    #[must_use]
    pub fn completed(args: &PeriodArgs) -> Self {
        Self::Completed(Period::from_str(&args.period))
    }

    #[must_use]
    pub fn all(args: &PeriodArgs) -> Self {
        Self::All(Period::from_str(&args.period))
    }

    const fn empty_message(self) -> &'static str {
        match self {
            Self::Active => "No active work items found.",
            Self::Completed(_) | Self::All(_) => "No work items found.",
        }
    }
}

/// Output for list commands.
#[derive(Serialize)]
struct ListOutput<'a> {
    total_completed: f64,
    count: usize,
    #[serde(flatten)]
    forest: &'a Forest,
}

/// Execute a list command.
pub fn execute(
    scope: ListScope,
    rollup: &RollupArgs,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let leaf_kind = leaf_kind(rollup)?;
    let config = config::load(config_path)?;
    let user_email = config.user_email.clone();
    let service = AzureDevOpsService::new(config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    let mut forest = rt.block_on(fetch_scope(&service, &user_email, scope))?;
    debug!(?scope, roots = forest.roots.len(), nodes = forest.node_count(), "Built forest");

    let total = compute_rollups(&mut forest, leaf_kind);

    if json {
        let output = ListOutput {
            total_completed: total,
            count: forest.roots.len(),
            forest: &forest,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if forest.is_empty() {
        println!("{}", scope.empty_message().yellow());
        return Ok(());
    }

    let options = RenderOptions {
        config: Some(service.config()),
        hyperlinks: std::io::stdout().is_terminal(),
    };
    print_forest(&forest, total, options);
    Ok(())
}

fn leaf_kind(rollup: &RollupArgs) -> Result<&str> {
    let kind = rollup.leaf_kind.trim();
    if kind.is_empty() {
        return Err(Error::InvalidArgument("--leaf-kind must not be empty".to_string()));
    }
    Ok(kind)
}

/// Fetch the forest for a scope.
///
/// For [`ListScope::All`] the two queries run concurrently, each building its
/// own forest, and are merged once both complete.
pub async fn fetch_scope<S: WorkItemService>(
    service: &S,
    user_email: &str,
    scope: ListScope,
) -> Result<Forest> {
    match scope {
        ListScope::Completed(period) => {
            fetch_forest(service, &completed_query(user_email, period)).await
        }
        ListScope::Active => fetch_forest(service, &active_query(user_email)).await,
        ListScope::All(period) => {
            let completed_wiql = completed_query(user_email, period);
            let active_wiql = active_query(user_email);

            let (completed, active) = tokio::join!(
                fetch_forest(service, &completed_wiql),
                fetch_forest(service, &active_wiql),
            );

            Ok(merge_forests(completed?, active?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::DEFAULT_LEAF_KIND;
    use crate::model::{LinkPair, WorkItem};
    use crate::service::mock::MockService;

    const USER: &str = "dev@contoso.com";

    fn service() -> MockService {
        MockService::default()
            .with_query(
                completed_query(USER, Period::Day),
                vec![
                    LinkPair::top_level(2),
                    LinkPair::new(1, 2),
                    LinkPair::top_level(3),
                    LinkPair::new(1, 3),
                ],
            )
            .with_query(
                active_query(USER),
                vec![
                    LinkPair::top_level(4),
                    LinkPair::new(1, 4),
                    LinkPair::top_level(6),
                    LinkPair::new(5, 6),
                ],
            )
            .with_items(vec![
                WorkItem::new(1, "Checkout", "Feature").with_state("Active"),
                WorkItem::new(2, "Form", "Task").with_state("Done").with_completed_work(3.0),
                WorkItem::new(3, "API", "Task").with_state("Done").with_completed_work(5.0),
                WorkItem::new(4, "Tests", "Task").with_state("Active").with_completed_work(1.0),
                WorkItem::new(5, "Search", "Feature").with_state("New"),
                WorkItem::new(6, "Index", "Task").with_state("Active"),
            ])
    }

    #[test]
    fn test_scope_from_args() {
        let args = PeriodArgs {
            period: "month".to_string(),
            rollup: RollupArgs {
                leaf_kind: DEFAULT_LEAF_KIND.to_string(),
            },
        };

        assert_eq!(ListScope::completed(&args), ListScope::Completed(Period::Month));
        assert_eq!(ListScope::all(&args), ListScope::All(Period::Month));
        assert_eq!(ListScope::Active.empty_message(), "No active work items found.");
    }

    #[test]
    fn test_blank_leaf_kind_is_rejected() {
        let blank = RollupArgs {
            leaf_kind: "  ".to_string(),
        };
        let err = leaf_kind(&blank).unwrap_err();
        assert_eq!(err.exit_code(), 4);

        let padded = RollupArgs {
            leaf_kind: " Bug ".to_string(),
        };
        assert_eq!(leaf_kind(&padded).unwrap(), "Bug");
    }

    #[tokio::test]
    async fn test_fetch_completed_scope_with_rollup() {
        let service = service();

        let mut forest = fetch_scope(&service, USER, ListScope::Completed(Period::Day))
            .await
            .unwrap();
        let total = compute_rollups(&mut forest, DEFAULT_LEAF_KIND);

        assert_eq!(forest.root_ids(), vec![1]);
        assert_eq!(total, 8.0);
        assert_eq!(forest.roots[0].item.completed_work, Some(8.0));
    }

    #[tokio::test]
    async fn test_fetch_all_scope_prefers_completed_roots() {
        let service = service();

        let mut forest = fetch_scope(&service, USER, ListScope::All(Period::Day))
            .await
            .unwrap();

        // Feature 1 appears in both results; the completed tree (2, 3) wins.
        assert_eq!(forest.root_ids(), vec![1, 5]);
        let children: Vec<_> = forest.roots[0].children.iter().map(|c| c.item.id).collect();
        assert_eq!(children, vec![2, 3]);

        let total = compute_rollups(&mut forest, DEFAULT_LEAF_KIND);
        assert_eq!(total, 8.0);
        assert_eq!(forest.roots[1].item.completed_work, None);
    }

    #[tokio::test]
    async fn test_fetch_all_scope_is_stable_across_runs() {
        let service = service();

        let first = fetch_scope(&service, USER, ListScope::All(Period::Day)).await.unwrap();
        let second = fetch_scope(&service, USER, ListScope::All(Period::Day)).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_active_scope() {
        let service = service();

        let forest = fetch_scope(&service, USER, ListScope::Active).await.unwrap();

        assert_eq!(forest.root_ids(), vec![1, 5]);
    }
}
