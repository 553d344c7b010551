// ── Device role ──

use std::fmt;

use panos_api::SystemInfo;
use serde::Serialize;

/// Whether the connected appliance is a firewall or a Panorama manager.
///
/// Fixed for the lifetime of one action invocation. Displayed and
/// serialized as `firewall` or `panorama`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRole {
    Firewall,
    #[serde(rename = "panorama")]
    Manager,
}

impl DeviceRole {
    /// Classify from `show system info`.
    ///
    /// Panorama reports model `Panorama` (virtual) or `M-<n>` (hardware);
    /// a hardware unit in management-only mode also reports it through
    /// `system-mode`.
    pub fn from_system_info(info: &SystemInfo) -> Self {
        let model_is_manager = info.model.as_deref().is_some_and(|m| {
            let m = m.trim();
            m.eq_ignore_ascii_case("panorama") || m.to_ascii_uppercase().starts_with("M-")
        });
        let mode_is_manager = info.system_mode.as_deref().is_some_and(|m| {
            let m = m.trim();
            m.eq_ignore_ascii_case("panorama") || m.eq_ignore_ascii_case("management-only")
        });

        if model_is_manager || mode_is_manager {
            Self::Manager
        } else {
            Self::Firewall
        }
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Firewall => "firewall",
            Self::Manager => "panorama",
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn info(model: Option<&str>, mode: Option<&str>) -> SystemInfo {
        SystemInfo {
            model: model.map(str::to_owned),
            system_mode: mode.map(str::to_owned),
            ..SystemInfo::default()
        }
    }

    #[test]
    fn firewall_models() {
        for model in ["PA-VM", "PA-3220", "PA-440"] {
            assert_eq!(
                DeviceRole::from_system_info(&info(Some(model), None)),
                DeviceRole::Firewall
            );
        }
    }

    #[test]
    fn panorama_models() {
        for model in ["Panorama", "panorama", "M-200", "m-600"] {
            assert_eq!(
                DeviceRole::from_system_info(&info(Some(model), None)),
                DeviceRole::Manager,
                "{model}"
            );
        }
    }

    #[test]
    fn management_only_mode_is_manager() {
        assert_eq!(
            DeviceRole::from_system_info(&info(None, Some("management-only"))),
            DeviceRole::Manager
        );
    }

    #[test]
    fn display_matches_serialized_name() {
        for role in [DeviceRole::Firewall, DeviceRole::Manager] {
            let json = serde_json::to_value(role).unwrap();
            assert_eq!(json.as_str(), Some(role.to_string().as_str()));
        }
        assert_eq!(DeviceRole::Manager.to_string(), "panorama");
    }

    #[test]
    fn missing_info_defaults_to_firewall() {
        assert_eq!(
            DeviceRole::from_system_info(&SystemInfo::default()),
            DeviceRole::Firewall
        );
    }
}
