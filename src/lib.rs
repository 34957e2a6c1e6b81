//! azdo - Azure DevOps work item trees with completed-work rollups
//!
//! This crate provides the core functionality for the `azdo` CLI tool.
//!
//! # Architecture
//!
//! - [`hierarchy`] - Forest reconstruction, rollups and merging (no I/O)
//! - [`model`] - Data types (WorkItem, LinkPair, TreeNode, Forest)
//! - [`service`] - Azure DevOps WIQL and work item REST calls
//! - [`config`] - Connection settings from environment and config file
//! - [`render`] - Colored tree output
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod render;
pub mod service;

pub use error::{Error, Result};
