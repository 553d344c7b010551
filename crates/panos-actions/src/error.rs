//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use panos_config::ConfigError;
use panos_core::{CoreError, ImportIdError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to appliance at {url}")]
    #[diagnostic(
        code(panos::connection_failed),
        help(
            "Check that the management interface is reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try: panos-actions system-info --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(panos::auth_failed),
        help("Verify the API key, or the username and password used to generate one.")
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(panos::no_credentials),
        help(
            "Pass --api-key, or --username with --password.\n\
             Or set PANOS_API_KEY (or PANOS_USERNAME and PANOS_PASSWORD)."
        )
    )]
    NoCredentials { profile: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(panos::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No appliance configured")]
    #[diagnostic(
        code(panos::no_config),
        help(
            "Pass --hostname, or add a profile to the configuration file.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(panos::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(panos::config))]
    Config(Box<ConfigError>),

    // ── Appliance ────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(panos::api_error))]
    ApiError { code: String, message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(panos::timeout),
        help("Increase the timeout with --timeout or check the appliance's load.")
    )]
    Timeout,

    #[error("Interrupted")]
    #[diagnostic(code(panos::cancelled))]
    Cancelled,

    // ── Actions ──────────────────────────────────────────────────────
    #[error("Action reported {errors} error(s)")]
    #[diagnostic(code(panos::action_failed))]
    ActionFailed { errors: usize },

    #[error(transparent)]
    #[diagnostic(code(panos::import_id))]
    ImportId(#[from] ImportIdError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON input: {0}")]
    #[diagnostic(code(panos::json), help("Check the JSON document and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Cancelled => exit_code::CANCELLED,
            Self::Validation { .. }
            | Self::NoConfig { .. }
            | Self::ProfileNotFound { .. }
            | Self::Json(_)
            | Self::ImportId(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Cancelled => CliError::Cancelled,
            CoreError::Api { message, code } => CliError::ApiError {
                code: code.unwrap_or_else(|| "error".into()),
                message,
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            other @ (CoreError::SubmitFailed { .. }
            | CoreError::WaitFailed { .. }
            | CoreError::Encoding { .. }
            | CoreError::Internal(_)) => CliError::ApiError {
                code: "internal".into(),
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}
