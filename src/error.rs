//! Error types for azdo.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (3=http, 5=api, 7=config, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! The hierarchy core never produces errors; everything here comes from
//! configuration, the REST API or output.

use thiserror::Error;

/// Result type alias for azdo operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Transport (exit 3)
    HttpError,

    // Validation (exit 4)
    InvalidArgument,

    // Service (exit 5)
    Unauthorized,
    ApiError,

    // Config (exit 7)
    NotConfigured,
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::HttpError => "HTTP_ERROR",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ApiError => "API_ERROR",
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::HttpError => 3,
            Self::InvalidArgument => 4,
            Self::Unauthorized | Self::ApiError => 5,
            Self::NotConfigured | Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether running the same command again may succeed unchanged.
    ///
    /// True for transport failures and server-side API errors. Auth,
    /// configuration and argument errors need the caller to change something.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpError | Self::ApiError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in azdo operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Azure DevOps configuration not found (missing: {})", missing.join(", "))]
    NotConfigured { missing: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Azure DevOps {operation} failed: {status} - {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotConfigured { .. } => ErrorCode::NotConfigured,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Http(_) => ErrorCode::HttpError,
            Self::Api { status: 203 | 401 | 403, .. } => ErrorCode::Unauthorized,
            Self::Api { .. } => ErrorCode::ApiError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotConfigured { missing } => {
                let mut hint = String::from("Set the following environment variables:\n");
                for var in missing {
                    hint.push_str(&format!("    {var}\n"));
                }
                hint.push_str("  or add them to ~/.azdo/config.json (see `azdo --help`)");
                Some(hint)
            }

            Self::Api { status: 203 | 401, .. } => Some(
                "The personal access token was rejected. \
                 Check AZDO_PAT and that it has the Work Items (Read) scope."
                    .to_string(),
            ),
            Self::Api { status: 403, .. } => Some(
                "Access denied. Check that your token can read work items in this project."
                    .to_string(),
            ),
            Self::Api { status: 404, .. } => Some(
                "Organization or project not found. Check AZDO_ORG and AZDO_PROJECT.".to_string(),
            ),
            Self::Api { status: 400, .. } => Some(
                "The query was rejected. Check that AZDO_USER_EMAIL matches your Azure DevOps identity."
                    .to_string(),
            ),

            Self::Http(e) if e.is_timeout() || e.is_connect() => Some(
                "Could not reach Azure DevOps. Check your network connection or AZDO_BASE_URL."
                    .to_string(),
            ),

            Self::Config(_)
            | Self::Http(_)
            | Self::Api { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
