// ── VM auth key ──
//
// Bootstrap key used by VM-series firewalls to register with Panorama.
// Generated by an op command; the key and its expiry come back as one
// sentence that we pick apart with regexes.

use std::sync::LazyLock;

use panos_api::XmlElement;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::appliance::Appliance;
use crate::diagnostics::Diagnostics;
use crate::session::Session;

pub const DEFAULT_LIFETIME_HOURS: u32 = 8760;
pub const MAX_LIFETIME_HOURS: u32 = 8760;

pub const PARSE_FAILED: &str = "Failed to parse VM auth key";
pub const EXPIRATION_MISSING: &str = "VM auth key expiration missing";

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)VM auth key\s+(\S+)\s+generated").expect("valid regex")
});
static EXPIRES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Expires at:\s*(\S(?:.*\S)?)").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VmAuthKey {
    pub vm_auth_key: String,
    pub expiration_date: Option<String>,
}

/// Pull the key and expiration out of the response text.
///
/// No key is a fatal error; a key without an expiration is returned with
/// a warning.
pub fn parse_vm_auth_key(text: &str, diags: &mut Diagnostics) -> Option<VmAuthKey> {
    let Some(key) = KEY_RE.captures(text).and_then(|c| c.get(1)) else {
        diags.add_error(
            PARSE_FAILED,
            format!("response did not contain a VM auth key: {text:?}"),
        );
        return None;
    };

    let expiration_date = EXPIRES_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned());
    if expiration_date.is_none() {
        diags.add_warning(
            EXPIRATION_MISSING,
            "the appliance did not report when the VM auth key expires",
        );
    }

    Some(VmAuthKey {
        vm_auth_key: key.as_str().to_owned(),
        expiration_date,
    })
}

/// `<request><bootstrap><vm-auth-key><generate><lifetime>H</lifetime>...`
pub fn generate_command(lifetime_hours: u32) -> XmlElement {
    XmlElement::new("request").child(
        XmlElement::new("bootstrap").child(
            XmlElement::new("vm-auth-key").child(
                XmlElement::new("generate")
                    .child(XmlElement::with_text("lifetime", lifetime_hours.to_string())),
            ),
        ),
    )
}

/// Generate a key valid for `lifetime_hours` (1..=8760).
pub async fn generate_vm_auth_key<A: Appliance>(
    session: &Session<'_, A>,
    lifetime_hours: u32,
    diags: &mut Diagnostics,
) -> Option<VmAuthKey> {
    if !(1..=MAX_LIFETIME_HOURS).contains(&lifetime_hours) {
        diags.add_error(
            "Invalid lifetime",
            format!("lifetime must be between 1 and {MAX_LIFETIME_HOURS} hours, got {lifetime_hours}"),
        );
        return None;
    }

    let cmd = generate_command(lifetime_hours);
    let result = match session.call(session.appliance().op(&cmd)).await {
        Ok(result) => result,
        Err(e) => {
            diags.add_core_error(true, "Failed to generate VM auth key", &e);
            return None;
        }
    };
    let text = result.flatten_text(" ");
    debug!(lifetime_hours, "VM auth key generated");
    parse_vm_auth_key(&text, diags)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_and_expiration() {
        let mut diags = Diagnostics::new();
        let key = parse_vm_auth_key(
            "VM auth key ABC generated. Expires at: 2030-01-01",
            &mut diags,
        )
        .unwrap();
        assert_eq!(key.vm_auth_key, "ABC");
        assert_eq!(key.expiration_date.as_deref(), Some("2030-01-01"));
        assert!(diags.is_empty());
    }

    #[test]
    fn expiration_keeps_time_component() {
        let mut diags = Diagnostics::new();
        let key = parse_vm_auth_key(
            "VM auth key 2:8737324 generated. Expires at: 2030/01/01 11:22:33 ",
            &mut diags,
        )
        .unwrap();
        assert_eq!(key.vm_auth_key, "2:8737324");
        assert_eq!(key.expiration_date.as_deref(), Some("2030/01/01 11:22:33"));
    }

    #[test]
    fn missing_expiration_is_a_warning() {
        let mut diags = Diagnostics::new();
        let key = parse_vm_auth_key("VM auth key ABC generated.", &mut diags).unwrap();
        assert_eq!(key.expiration_date, None);
        assert!(!diags.has_error());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn missing_key_is_fatal() {
        let mut diags = Diagnostics::new();
        assert!(parse_vm_auth_key("command succeeded", &mut diags).is_none());
        assert!(diags.has_error());
    }

    #[test]
    fn command_shape() {
        assert_eq!(
            generate_command(24).to_xml().unwrap(),
            "<request><bootstrap><vm-auth-key><generate><lifetime>24</lifetime>\
             </generate></vm-auth-key></bootstrap></request>"
        );
    }
}
