use thiserror::Error;

/// Top-level error type for the `panos-api` crate.
///
/// Covers every failure mode of the XML API surface: authentication,
/// transport, response envelopes, and XML decoding. `panos-core` maps
/// these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Key generation failed or the appliance rejected the API key.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The client has no API key yet (call `keygen` first).
    #[error("No API key available -- generate one with username/password first")]
    MissingApiKey,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status without a parseable XML envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── XML API ─────────────────────────────────────────────────────
    /// `<response status="error">` envelope returned by the appliance.
    #[error("PAN-OS API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// XML could not be parsed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// XML command could not be serialized.
    #[error("Failed to build XML command: {0}")]
    Encoding(String),
}

impl Error {
    /// Returns `true` if this error indicates the credentials were rejected.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } | Self::MissingApiKey => true,
            Self::Http { status, .. } => *status == 401 || *status == 403,
            // PAN-OS reports invalid credentials as API error code 403.
            Self::Api { code, .. } => code.as_deref() == Some("403"),
            _ => false,
        }
    }
}
