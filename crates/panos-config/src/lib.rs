//! Connection profiles for PAN-OS actions.
//!
//! TOML profiles, credential resolution (env + plaintext), and
//! translation to `panos_core::ApplianceConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use panos_core::{ApplianceConfig, AuthCredentials, TlsVerification};

/// Prefix for environment overrides (`PANOS_DEFAULTS__TIMEOUT=60`).
pub const ENV_PREFIX: &str = "PANOS_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named appliance profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub skip_verify_certificate: bool,

    /// Request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Job poll interval, seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            skip_verify_certificate: false,
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    2
}

/// A named appliance profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Firewall or Panorama hostname / IP.
    pub hostname: String,

    /// `https` (default) or `http`.
    #[serde(default = "default_protocol")]
    pub protocol: String,

    pub port: Option<u16>,

    /// XML API key (plaintext -- prefer `PANOS_API_KEY`).
    pub api_key: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext -- prefer `PANOS_PASSWORD`).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub skip_verify_certificate: Option<bool>,

    /// Override request timeout, seconds.
    pub timeout: Option<u64>,

    /// Override job poll interval, seconds.
    pub poll_interval: Option<u64>,
}

fn default_protocol() -> String {
    "https".into()
}

impl Profile {
    /// `{protocol}://{hostname}[:{port}]`
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        if self.hostname.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "hostname".into(),
                reason: "must not be empty".into(),
            });
        }
        let protocol = match self.protocol.as_str() {
            "" => "https",
            p @ ("http" | "https") => p,
            other => {
                return Err(ConfigError::Validation {
                    field: "protocol".into(),
                    reason: format!("expected 'https' or 'http', got '{other}'"),
                });
            }
        };
        let raw = match self.port {
            Some(port) => format!("{protocol}://{}:{port}", self.hostname.trim()),
            None => format!("{protocol}://{}", self.hostname.trim()),
        };
        raw.parse().map_err(|e| ConfigError::Validation {
            field: "hostname".into(),
            reason: format!("invalid URL {raw}: {e}"),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "panos-actions", "panos-actions").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("panos-actions");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file is not an
/// error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve `AuthCredentials` for a profile.
///
/// An API key wins over username/password. Each value is taken from its
/// `PANOS_*` environment variable first, then from the profile.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    resolve_auth_with(profile, profile_name, |name| std::env::var(name).ok())
}

fn resolve_auth_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AuthCredentials, ConfigError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

    if let Some(key) = non_empty(env("PANOS_API_KEY")).or_else(|| non_empty(profile.api_key.clone())) {
        return Ok(AuthCredentials::ApiKey(SecretString::from(key)));
    }

    let username = non_empty(env("PANOS_USERNAME")).or_else(|| non_empty(profile.username.clone()));
    let password = non_empty(env("PANOS_PASSWORD")).or_else(|| non_empty(profile.password.clone()));
    match (username, password) {
        (Some(username), Some(password)) => Ok(AuthCredentials::Credentials {
            username,
            password: SecretString::from(password),
        }),
        _ => Err(ConfigError::NoCredentials {
            profile: profile_name.into(),
        }),
    }
}

/// TLS strategy for a profile, with `defaults` as fallback.
pub fn resolve_tls(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile
        .skip_verify_certificate
        .unwrap_or(defaults.skip_verify_certificate)
    {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build an `ApplianceConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_appliance_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ApplianceConfig, ConfigError> {
    let auth = resolve_auth(profile, profile_name)?;
    appliance_config_with_auth(profile, defaults, auth)
}

/// Build an `ApplianceConfig` from a profile with already-resolved
/// credentials.
pub fn appliance_config_with_auth(
    profile: &Profile,
    defaults: &Defaults,
    auth: AuthCredentials,
) -> Result<ApplianceConfig, ConfigError> {
    let url = profile.base_url()?;
    let poll_interval = profile.poll_interval.unwrap_or(defaults.poll_interval);
    if poll_interval == 0 {
        return Err(ConfigError::Validation {
            field: "poll_interval".into(),
            reason: "must be at least one second".into(),
        });
    }

    Ok(ApplianceConfig {
        url,
        auth,
        tls: resolve_tls(profile, defaults),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        poll_interval: Duration::from_secs(poll_interval),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn profile(hostname: &str) -> Profile {
        Profile {
            hostname: hostname.into(),
            protocol: default_protocol(),
            ..Profile::default()
        }
    }

    #[test]
    fn base_url_from_parts() {
        let mut p = profile("fw.example.com");
        assert_eq!(p.base_url().unwrap().as_str(), "https://fw.example.com/");
        p.port = Some(8443);
        p.protocol = "http".into();
        assert_eq!(p.base_url().unwrap().as_str(), "http://fw.example.com:8443/");
    }

    #[test]
    fn base_url_rejects_bad_protocol_and_empty_host() {
        let mut p = profile("fw");
        p.protocol = "ftp".into();
        assert!(matches!(p.base_url(), Err(ConfigError::Validation { ref field, .. }) if field == "protocol"));
        assert!(profile("  ").base_url().is_err());
    }

    #[test]
    fn api_key_wins_over_credentials() {
        let p = Profile {
            api_key: Some("from-file".into()),
            username: Some("admin".into()),
            password: Some("pw".into()),
            ..profile("fw")
        };
        let auth = resolve_auth_with(&p, "default", |_| None).unwrap();
        assert!(matches!(auth, AuthCredentials::ApiKey(ref k) if k.expose_secret() == "from-file"));
    }

    #[test]
    fn env_overrides_profile() {
        let p = Profile {
            api_key: Some("from-file".into()),
            ..profile("fw")
        };
        let env = |name: &str| (name == "PANOS_API_KEY").then(|| "from-env".to_owned());
        let auth = resolve_auth_with(&p, "default", env).unwrap();
        assert!(matches!(auth, AuthCredentials::ApiKey(ref k) if k.expose_secret() == "from-env"));
    }

    #[test]
    fn credentials_need_both_halves() {
        let p = Profile {
            username: Some("admin".into()),
            ..profile("fw")
        };
        assert!(matches!(
            resolve_auth_with(&p, "lab", |_| None),
            Err(ConfigError::NoCredentials { ref profile }) if profile == "lab"
        ));
        let env = |name: &str| (name == "PANOS_PASSWORD").then(|| "pw".to_owned());
        assert!(matches!(
            resolve_auth_with(&p, "lab", env).unwrap(),
            AuthCredentials::Credentials { ref username, .. } if username == "admin"
        ));
    }

    #[test]
    fn tls_resolution() {
        let defaults = Defaults::default();
        assert_eq!(resolve_tls(&profile("fw"), &defaults), TlsVerification::SystemDefaults);
        let p = Profile {
            ca_cert: Some("/etc/panos/ca.pem".into()),
            ..profile("fw")
        };
        assert_eq!(
            resolve_tls(&p, &defaults),
            TlsVerification::CustomCa("/etc/panos/ca.pem".into())
        );
        let p = Profile {
            skip_verify_certificate: Some(true),
            ..p
        };
        assert_eq!(resolve_tls(&p, &defaults), TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn load_profiles_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                api_key: Some("k".into()),
                poll_interval: Some(5),
                ..profile("10.0.0.1")
            },
        );
        cfg.default_profile = Some("lab".into());
        std::fs::write(&path, toml::to_string_pretty(&cfg).unwrap()).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_profile_name(), "lab");
        let lab = loaded.profile("lab").unwrap();
        assert_eq!(lab.hostname, "10.0.0.1");
        assert_eq!(lab.protocol, "https");
        assert_eq!(loaded.defaults.timeout, 30);
        assert!(matches!(loaded.profile("prod"), Err(ConfigError::UnknownProfile { .. })));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.poll_interval, 2);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profile_translation_applies_defaults() {
        let p = Profile {
            api_key: Some("k".into()),
            timeout: Some(90),
            ..profile("pano.example.com")
        };
        // Only exercised when no PANOS_* credential env vars are set.
        if std::env::var_os("PANOS_API_KEY").is_none() {
            let cfg = profile_to_appliance_config(&p, "default", &Defaults::default()).unwrap();
            assert_eq!(cfg.timeout, Duration::from_secs(90));
            assert_eq!(cfg.poll_interval, Duration::from_secs(2));
            assert_eq!(cfg.url.as_str(), "https://pano.example.com/");
        }
    }
}
