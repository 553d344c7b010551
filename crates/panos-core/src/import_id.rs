// ── Import ids ──
//
// Resources are imported by an opaque id: the resource's identity fields
// as canonical JSON, base64 encoded. Each resource type registers the
// routine that extracts its identity.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportIdError {
    #[error("no import id routine registered for resource {resource:?}")]
    UnknownResource { resource: String },

    #[error("import id input for {resource} must be an object, got {found}")]
    WrongShape { resource: String, found: &'static str },

    #[error("failed to encode import id for {resource}: {message}")]
    Encoding { resource: String, message: String },

    #[error("invalid import id: {message}")]
    Decoding { message: String },
}

/// Extracts the identity bytes of one resource object.
pub type ImportIdFn = fn(&Map<String, Value>) -> Result<Vec<u8>, String>;

/// Resource name → import id routine.
#[derive(Debug, Clone, Default)]
pub struct ImportIdRegistry {
    routines: BTreeMap<&'static str, ImportIdFn>,
}

/// Object resources identified by location and name.
const NAMED_RESOURCES: &[&str] = &[
    "panos_address",
    "panos_address_group",
    "panos_administrative_tag",
    "panos_device_group",
    "panos_ethernet_interface",
    "panos_service",
    "panos_service_group",
    "panos_template",
    "panos_template_stack",
    "panos_template_variable",
    "panos_virtual_router",
    "panos_zone",
];

/// Rulebase resources identified by location, position and rule names.
const RULE_RESOURCES: &[&str] = &[
    "panos_nat_policy_rules",
    "panos_security_policy_rules",
];

impl ImportIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in resource.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for name in NAMED_RESOURCES {
            registry.register(name, named_identity);
        }
        for name in RULE_RESOURCES {
            registry.register(name, rules_identity);
        }
        registry
    }

    pub fn register(&mut self, resource: &'static str, routine: ImportIdFn) {
        self.routines.insert(resource, routine);
    }

    pub fn resources(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routines.keys().copied()
    }

    /// Produce the base64 import id for `object` of type `resource`.
    pub fn generate(&self, resource: &str, object: &Value) -> Result<String, ImportIdError> {
        let routine = self
            .routines
            .get(resource)
            .ok_or_else(|| ImportIdError::UnknownResource {
                resource: resource.to_owned(),
            })?;
        let Value::Object(map) = object else {
            return Err(ImportIdError::WrongShape {
                resource: resource.to_owned(),
                found: json_kind(object),
            });
        };
        let bytes = routine(map).map_err(|message| ImportIdError::Encoding {
            resource: resource.to_owned(),
            message,
        })?;
        Ok(STANDARD.encode(bytes))
    }
}

/// Reverse of [`ImportIdRegistry::generate`]: the identity object.
pub fn decode_import_id(encoded: &str) -> Result<Value, ImportIdError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ImportIdError::Decoding {
            message: e.to_string(),
        })?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| ImportIdError::Decoding {
        message: e.to_string(),
    })?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ImportIdError::Decoding {
            message: format!("expected an object, got {}", json_kind(&value)),
        })
    }
}

// ── Identity routines ────────────────────────────────────────────────

fn named_identity(object: &Map<String, Value>) -> Result<Vec<u8>, String> {
    let mut identity = Map::new();
    identity.insert("location".into(), required(object, "location")?.clone());
    identity.insert("name".into(), required_string(object, "name")?);
    canonical(&identity)
}

fn rules_identity(object: &Map<String, Value>) -> Result<Vec<u8>, String> {
    let rules = required(object, "rules")?
        .as_array()
        .ok_or("rules must be a list")?;
    let names = rules
        .iter()
        .map(|rule| {
            rule.get("name")
                .and_then(Value::as_str)
                .filter(|n| !n.is_empty())
                .map(|n| Value::String(n.to_owned()))
                .ok_or_else(|| "every rule needs a name".to_owned())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut identity = Map::new();
    identity.insert("location".into(), required(object, "location")?.clone());
    identity.insert("position".into(), required(object, "position")?.clone());
    identity.insert("names".into(), Value::Array(names));
    canonical(&identity)
}

fn required<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Value, String> {
    object
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| format!("missing {field}"))
}

fn required_string(object: &Map<String, Value>, field: &str) -> Result<Value, String> {
    match required(object, field)? {
        Value::String(s) if !s.is_empty() => Ok(Value::String(s.clone())),
        _ => Err(format!("{field} must be a non-empty string")),
    }
}

/// Keys come out sorted: `serde_json::Map` is ordered.
fn canonical(identity: &Map<String, Value>) -> Result<Vec<u8>, String> {
    serde_json::to_vec(identity).map_err(|e| e.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
