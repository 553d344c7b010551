// ── Core error types ──
//
// User-facing errors from panos-core. Consumers never see raw HTTP
// status codes or XML parse failures directly. The
// `From<panos_api::Error>` impl translates transport-layer errors into
// domain-appropriate variants; the action layer turns these into
// diagnostics.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to appliance at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Appliance request timed out")]
    Timeout,

    #[error("Operation cancelled")]
    Cancelled,

    // ── Job errors ───────────────────────────────────────────────────
    #[error("Failed to submit job: {message}")]
    SubmitFailed { message: String },

    #[error("Job {job_id} failed: {message}")]
    WaitFailed { job_id: u64, message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The PAN-OS response code (e.g. "17" for a commit conflict).
        code: Option<String>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<panos_api::Error> for CoreError {
    fn from(err: panos_api::Error) -> Self {
        match err {
            panos_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            panos_api::Error::MissingApiKey => CoreError::AuthenticationFailed {
                message: "no API key available".into(),
            },
            // HTTP 401/403 and API code 403 are rejected credentials too
            other if other.is_auth_failure() => CoreError::AuthenticationFailed {
                message: other.to_string(),
            },
            panos_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: e.status().map(|s| s.as_u16().to_string()),
                    }
                }
            }
            panos_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            panos_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            panos_api::Error::Http { status, body } => CoreError::Api {
                message: format!("HTTP {status}: {body}"),
                code: Some(status.to_string()),
            },
            panos_api::Error::Api { message, code } => CoreError::Api { message, code },
            panos_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            panos_api::Error::Encoding(message) => CoreError::Encoding { message },
        }
    }
}
