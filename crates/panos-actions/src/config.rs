//! CLI configuration -- thin wrapper around `panos_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--hostname, --api-key, --insecure, ...).

use secrecy::SecretString;
use url::Url;

use panos_config::{Config, Profile};
use panos_core::{ApplianceConfig, AuthCredentials};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use panos_config::{config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Build an `ApplianceConfig` from the config file, profile, and CLI
/// overrides.
pub fn build_appliance_config(global: &GlobalOpts) -> Result<ApplianceConfig, CliError> {
    let cfg = load_config_or_default();
    resolve(global, &cfg)
}

pub(crate) fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<ApplianceConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        None if global.hostname.is_some() => Profile {
            protocol: "https".into(),
            ..Profile::default()
        },
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    apply_overrides(&mut profile, global)?;

    let config = match flag_credentials(global) {
        Some(auth) => panos_config::appliance_config_with_auth(&profile, &cfg.defaults, auth)?,
        None => panos_config::profile_to_appliance_config(&profile, &profile_name, &cfg.defaults)?,
    };
    tracing::debug!(profile = %profile_name, url = %config.url, "resolved appliance config");
    Ok(config)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref hostname) = global.hostname {
        if hostname.contains("://") {
            // Full URL form: https://fw.example.com:8443
            let url: Url = hostname.parse().map_err(|e| CliError::Validation {
                field: "hostname".into(),
                reason: format!("invalid URL {hostname}: {e}"),
            })?;
            profile.protocol = url.scheme().to_owned();
            profile.hostname = url.host_str().unwrap_or_default().to_owned();
            profile.port = url.port();
        } else {
            profile.hostname.clone_from(hostname);
        }
    }
    if global.insecure {
        profile.skip_verify_certificate = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if let Some(poll_interval) = global.poll_interval {
        profile.poll_interval = Some(poll_interval);
    }
    Ok(())
}

/// Credentials given directly on the command line win over the profile.
fn flag_credentials(global: &GlobalOpts) -> Option<AuthCredentials> {
    if let Some(ref key) = global.api_key {
        return Some(AuthCredentials::ApiKey(SecretString::from(key.clone())));
    }
    match (&global.username, &global.password) {
        (Some(username), Some(password)) => Some(AuthCredentials::Credentials {
            username: username.clone(),
            password: SecretString::from(password.clone()),
        }),
        _ => None,
    }
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
