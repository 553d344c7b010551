// ── Runtime connection configuration ──
//
// These types describe *how* to reach a firewall or Panorama. They carry
// credential data and connection tuning, but never touch disk. The CLI
// constructs an `ApplianceConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How to authenticate with the appliance.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Pre-generated XML API key (preferred).
    ApiKey(SecretString),
    /// Username/password, exchanged for a key via `type=keygen` on connect.
    Credentials {
        username: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (factory self-signed certs).
    DangerAcceptInvalid,
}

impl PartialEq for TlsVerification {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SystemDefaults, Self::SystemDefaults)
            | (Self::DangerAcceptInvalid, Self::DangerAcceptInvalid) => true,
            (Self::CustomCa(a), Self::CustomCa(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TlsVerification {}

/// Configuration for connecting to a single appliance.
///
/// Built by the CLI, passed to [`connect`](crate::appliance::connect) --
/// core never reads config files.
#[derive(Debug, Clone)]
pub struct ApplianceConfig {
    /// Appliance URL (e.g., `https://192.168.1.1`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between job status polls.
    pub poll_interval: Duration,
}

impl ApplianceConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::default(),
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_default_tuning() {
        let cfg = ApplianceConfig::new(
            "https://fw.example.com".parse().unwrap(),
            AuthCredentials::ApiKey(SecretString::from("k".to_string())),
        );
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.poll_interval, Duration::from_secs(2));
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }
}
