//! WIQL query builders.
//!
//! Both queries are one-hop links queries over the parent → child hierarchy.
//! Targets are the user's tasks; sources are whatever they hang off, so the
//! result contains each task together with its immediate parent.

/// Reporting period for completed work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

impl Period {
    /// WIQL date macro for the start of the period.
    #[must_use]
    pub const fn macro_name(&self) -> &'static str {
        match self {
            Self::Day => "@StartOfDay",
            Self::Week => "@StartOfWeek",
            Self::Month => "@StartOfMonth",
        }
    }

    /// Parse from string, falling back to [`Period::Day`] for unknown values.
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::Day,
        }
    }
}

/// States excluded from the active query.
const FINISHED_STATES: [&str; 3] = ["Done", "Closed", "Removed"];

/// Tasks assigned to `user_email` that were closed as Done within `period`.
#[must_use]
pub fn completed_query(user_email: &str, period: Period) -> String {
    format!(
        "SELECT [System.Id] \
         FROM WorkItemLinks \
         WHERE \
         ( \
         [Target].[System.AssignedTo] = '{user}' \
         AND [Target].[System.State] = 'Done' \
         AND [Target].[Microsoft.VSTS.Common.ClosedDate] >= {period} \
         AND [Target].[System.WorkItemType] = 'Task' \
         ) \
         AND [System.Links.LinkType] = 'System.LinkTypes.Hierarchy-Forward' \
         AND [Source].[System.WorkItemType] <> ''",
        user = quote(user_email),
        period = period.macro_name(),
    )
}

/// Tasks assigned to `user_email` that are not finished yet.
#[must_use]
pub fn active_query(user_email: &str) -> String {
    let finished = FINISHED_STATES
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "SELECT [System.Id] \
         FROM WorkItemLinks \
         WHERE \
         ( \
         [Target].[System.AssignedTo] = '{user}' \
         AND [Target].[System.State] NOT IN ({finished}) \
         AND [Target].[System.WorkItemType] = 'Task' \
         ) \
         AND [System.Links.LinkType] = 'System.LinkTypes.Hierarchy-Forward' \
         AND [Source].[System.WorkItemType] <> ''",
        user = quote(user_email),
    )
}

/// Escape a value for use inside a single-quoted WIQL literal.
fn quote(value: &str) -> String {
    value.replace('\'', "''")
}
