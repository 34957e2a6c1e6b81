//! Configuration management.
//!
//! Resolves the Azure DevOps organization, project, credentials and user
//! identity needed by the query service.
//!
//! # Resolution
//!
//! Each field is resolved independently, first match wins:
//! 1. Environment variables (`AZDO_ORG`, `AZDO_PROJECT`, `AZDO_PAT`,
//!    `AZDO_USER_EMAIL`, `AZDO_BASE_URL`)
//! 2. JSON config file: `--config` flag, then `AZDO_CONFIG`, then
//!    `~/.azdo/config.json`
//! 3. Built-in default (only `base_url` has one)
//!
//! Blank values count as unset.

use crate::error::{Error, Result};
use crate::model::WorkItemId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default Azure DevOps Services host.
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";

/// Environment variable names.
pub mod env {
    pub const ORG: &str = "AZDO_ORG";
    pub const PROJECT: &str = "AZDO_PROJECT";
    pub const PAT: &str = "AZDO_PAT";
    pub const USER_EMAIL: &str = "AZDO_USER_EMAIL";
    pub const BASE_URL: &str = "AZDO_BASE_URL";
    pub const CONFIG: &str = "AZDO_CONFIG";
}

/// Resolved Azure DevOps connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct AzDoConfig {
    pub organization: String,
    pub project: String,
    pub personal_access_token: String,
    pub user_email: String,
    /// Host URL without trailing slash (e.g. `https://dev.azure.com`)
    pub base_url: String,
}

// Keep the token out of debug logs.
impl std::fmt::Debug for AzDoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzDoConfig")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("personal_access_token", &"<redacted>")
            .field("user_email", &self.user_email)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AzDoConfig {
    /// Browser URL of a work item.
    #[must_use]
    pub fn work_item_url(&self, id: WorkItemId) -> String {
        format!(
            "{}/{}/{}/_workitems/edit/{id}",
            self.base_url, self.organization, self.project
        )
    }

    /// REST API URL for a project-scoped path such as `_apis/wit/wiql`.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            self.organization,
            self.project,
            path.trim_start_matches('/')
        )
    }
}

/// On-disk config file shape.
///
/// Keys are the camelCase field names (`organization`, `project`,
/// `personalAccessToken`, `userEmail`, `baseUrl`), not the `AZDO_*`
/// variable names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub personal_access_token: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Default config file location: `~/.azdo/config.json`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".azdo").join("config.json"))
}

/// Read a config file.
///
/// A missing file is only an error when it was asked for explicitly.
pub fn read_config_file(path: &Path, explicit: bool) -> Result<ConfigFile> {
    if !path.exists() {
        if explicit {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file {}: {e}", path.display())))
}

/// Load configuration from the process environment and config file.
pub fn load(explicit_path: Option<&Path>) -> Result<AzDoConfig> {
    let env_lookup = |key: &str| std::env::var(key).ok();

    let (path, explicit) = match explicit_path {
        Some(p) => (Some(p.to_path_buf()), true),
        None => match non_blank(env_lookup(env::CONFIG)) {
            Some(p) => (Some(PathBuf::from(p)), true),
            None => (default_config_path(), false),
        },
    };

    let file = match &path {
        Some(p) => {
            debug!(path = %p.display(), explicit, "Reading config file");
            read_config_file(p, explicit)?
        }
        None => ConfigFile::default(),
    };

    resolve(env_lookup, &file)
}

/// Merge environment values over a config file.
///
/// Fails with [`Error::NotConfigured`] listing every missing variable.
pub fn resolve<F>(lookup: F, file: &ConfigFile) -> Result<AzDoConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = Vec::new();
    let mut field = |key: &str, from_file: Option<&str>| {
        non_blank(lookup(key))
            .or_else(|| non_blank(from_file.map(str::to_string)))
            .unwrap_or_else(|| {
                missing.push(key.to_string());
                String::new()
            })
    };

    let organization = field(env::ORG, file.organization.as_deref());
    let project = field(env::PROJECT, file.project.as_deref());
    let personal_access_token = field(env::PAT, file.personal_access_token.as_deref());
    let user_email = field(env::USER_EMAIL, file.user_email.as_deref());

    if !missing.is_empty() {
        return Err(Error::NotConfigured { missing });
    }

    let base_url = non_blank(lookup(env::BASE_URL))
        .or_else(|| non_blank(file.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    Ok(AzDoConfig {
        organization,
        project,
        personal_access_token,
        user_email,
        base_url,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
