//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::hierarchy::DEFAULT_LEAF_KIND;

pub mod commands;

/// azdo - Azure DevOps work item trees with completed-work rollups
#[derive(Parser, Debug)]
#[command(name = "azdo", author, version, about, long_about = None)]
#[command(after_help = "\
Configuration (environment variables override ~/.azdo/config.json):
  AZDO_ORG          Organization name
  AZDO_PROJECT      Project name
  AZDO_PAT          Personal access token (Work Items: Read)
  AZDO_USER_EMAIL   Your Azure DevOps identity
  AZDO_BASE_URL     Host URL (default: https://dev.azure.com)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: ~/.azdo/config.json)
    #[arg(long, global = true, env = "AZDO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no log output or human-readable error messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List completed work items assigned to you for a period (default: today)
    ListCompleted(PeriodArgs),

    /// List active work items assigned to you
    ListActive(RollupArgs),

    /// List all (completed and active) work items assigned to you for a period
    ListAll(PeriodArgs),

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Rollup options shared by every list command.
#[derive(Args, Debug, Clone)]
pub struct RollupArgs {
    /// Work item type whose completed work is summed
    #[arg(long, default_value = DEFAULT_LEAF_KIND)]
    pub leaf_kind: String,
}

#[derive(Args, Debug, Clone)]
pub struct PeriodArgs {
    /// Period to list completed work items: day (@StartOfDay), week (@StartOfWeek),
    /// month (@StartOfMonth)
    #[arg(short, long, default_value = "day")]
    pub period: String,

    #[command(flatten)]
    pub rollup: RollupArgs,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
