// ── Push to devices ──
//
// Panorama commit-all: per-type flag gating, payload build, submit and
// wait. Shared by the commit action (failures degrade to warnings) and
// the standalone push action (failures are errors).

use panos_api::XmlElement;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::{debug, warn};

use crate::appliance::Appliance;
use crate::diagnostics::{AttributePath, Diagnostic, Diagnostics, Severity};
use crate::job::{self, CommitPayload, JobHandle};
use crate::session::Session;

pub const INVALID_PUSH_TYPE: &str = "Invalid push configuration type";
pub const INCLUDE_TEMPLATE_IGNORED: &str = "include_template ignored";
pub const FORCE_TEMPLATE_VALUES_IGNORED: &str = "force_template_values ignored";
pub const DEVICES_IGNORED: &str = "devices ignored";
pub const PUSH_SUBMIT_FAILED: &str = "Failed to submit push to devices";
pub const PUSH_WAIT_FAILED: &str = "Failed to push configuration to devices";

/// Commit-all target type. Parsed from the user-facing literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, EnumIter)]
pub enum PushKind {
    #[strum(serialize = "device_group")]
    DeviceGroup,
    #[strum(serialize = "template")]
    Template,
    #[strum(serialize = "template_stack")]
    TemplateStack,
    #[strum(serialize = "log_collector_group")]
    LogCollectorGroup,
    #[strum(serialize = "wildfire_appliance")]
    WildfireAppliance,
    #[strum(serialize = "wildfire_cluster")]
    WildfireCluster,
}

/// Whether a push type carries a flag to the appliance or strips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagPolicy {
    Keep,
    Strip,
}

impl PushKind {
    /// User-facing literal, e.g. `template_stack`.
    pub fn literal(self) -> &'static str {
        self.into()
    }

    /// Appliance commit-all vocabulary, e.g. `template stack`.
    pub fn internal_name(self) -> &'static str {
        match self {
            Self::DeviceGroup => "device group",
            Self::Template => "template",
            Self::TemplateStack => "template stack",
            Self::LogCollectorGroup => "log collector group",
            Self::WildfireAppliance => "wildfire appliance",
            Self::WildfireCluster => "wildfire cluster",
        }
    }

    /// (`include_template`, `force_template_values`) policy.
    pub fn flag_policy(self) -> (FlagPolicy, FlagPolicy) {
        use FlagPolicy::{Keep, Strip};
        match self {
            Self::DeviceGroup => (Keep, Keep),
            Self::Template | Self::TemplateStack => (Strip, Keep),
            Self::LogCollectorGroup | Self::WildfireAppliance | Self::WildfireCluster => {
                (Strip, Strip)
            }
        }
    }

    /// Whether the commit-all payload lists target devices.
    fn carries_devices(self) -> bool {
        matches!(self, Self::DeviceGroup | Self::Template | Self::TemplateStack)
    }

    fn allowed_literals() -> String {
        Self::iter().map(Self::literal).collect::<Vec<_>>().join(", ")
    }
}

/// Coerced push parameters. `push_type` stays the raw user string
/// until gating parses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushSpec {
    pub push_type: String,
    pub name: String,
    pub description: Option<String>,
    pub include_template: bool,
    pub force_template_values: bool,
    /// Target device serials, in user order.
    pub devices: Vec<String>,
    pub fail_on_error: bool,
    /// Attribute holding the push model; `None` at the action's top level.
    pub prefix: Option<AttributePath>,
}

impl PushSpec {
    fn path(&self, field: &str) -> AttributePath {
        AttributePath::under(self.prefix.as_ref(), field)
    }
}

/// Parse the push type and strip inputs the type cannot carry, warning
/// once per stripped flag and once for dropped devices. Returns `None`
/// (after reporting) for an unknown type.
pub fn gate_push_flags(spec: &mut PushSpec, diags: &mut Diagnostics) -> Option<PushKind> {
    let Ok(kind) = spec.push_type.parse::<PushKind>() else {
        diags.push(
            Diagnostic::new(
                Severity::for_policy(spec.fail_on_error),
                INVALID_PUSH_TYPE,
                format!(
                    "push type {:?} is not one of: {}",
                    spec.push_type,
                    PushKind::allowed_literals()
                ),
            )
            .at(spec.path("type")),
        );
        return None;
    };

    let (include_policy, force_policy) = kind.flag_policy();
    if include_policy == FlagPolicy::Strip && spec.include_template {
        spec.include_template = false;
        diags.add_attribute_warning(
            spec.path("include_template"),
            INCLUDE_TEMPLATE_IGNORED,
            format!("include_template has no effect for {} pushes", kind.literal()),
        );
    }
    if force_policy == FlagPolicy::Strip && spec.force_template_values {
        spec.force_template_values = false;
        diags.add_attribute_warning(
            spec.path("force_template_values"),
            FORCE_TEMPLATE_VALUES_IGNORED,
            format!("force_template_values has no effect for {} pushes", kind.literal()),
        );
    }
    if !kind.carries_devices() && !spec.devices.is_empty() {
        spec.devices.clear();
        diags.add_attribute_warning(
            spec.path("devices"),
            DEVICES_IGNORED,
            format!("{} pushes do not target individual devices", kind.literal()),
        );
    }
    Some(kind)
}

/// A gated commit-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPayload {
    pub kind: PushKind,
    pub name: String,
    pub description: Option<String>,
    pub include_template: bool,
    pub force_template_values: bool,
    pub devices: Vec<String>,
}

impl PushPayload {
    /// Build from a spec that already went through [`gate_push_flags`].
    pub fn new(kind: PushKind, spec: &PushSpec) -> Self {
        Self {
            kind,
            name: spec.name.clone(),
            description: spec.description.clone().filter(|d| !d.is_empty()),
            include_template: spec.include_template,
            force_template_values: spec.force_template_values,
            devices: spec.devices.clone(),
        }
    }

    pub fn to_element(&self) -> XmlElement {
        let description = || {
            self.description
                .as_deref()
                .map(|d| XmlElement::with_text("description", d))
        };

        let body = match self.kind {
            PushKind::DeviceGroup => {
                let mut entry = XmlElement::entry(&self.name);
                if !self.devices.is_empty() {
                    let mut devices = XmlElement::new("devices");
                    devices.children = self.devices.iter().map(XmlElement::entry).collect();
                    entry.push(devices);
                }
                let mut shared = XmlElement::new("shared-policy")
                    .child(XmlElement::new("device-group").child(entry));
                shared.children.extend(description());
                shared
                    .child(XmlElement::with_text("include-template", yes_no(self.include_template)))
                    .child(XmlElement::with_text(
                        "force-template-values",
                        yes_no(self.force_template_values),
                    ))
            }
            PushKind::Template | PushKind::TemplateStack => {
                let tag = if self.kind == PushKind::Template {
                    "template"
                } else {
                    "template-stack"
                };
                let mut el = XmlElement::new(tag).child(XmlElement::with_text("name", &self.name));
                el.children.extend(description());
                el.push(XmlElement::with_text(
                    "force-template-values",
                    yes_no(self.force_template_values),
                ));
                if !self.devices.is_empty() {
                    el.push(XmlElement::members("device", self.devices.iter().cloned()));
                }
                el
            }
            PushKind::LogCollectorGroup => {
                let mut el = XmlElement::new("log-collector-config")
                    .child(XmlElement::with_text("log-collector-group", &self.name));
                el.children.extend(description());
                el
            }
            PushKind::WildfireAppliance | PushKind::WildfireCluster => {
                let tag = if self.kind == PushKind::WildfireAppliance {
                    "wildfire-appliance"
                } else {
                    "wildfire-appliance-cluster"
                };
                let mut el = XmlElement::new("wildfire-appliance-config")
                    .child(XmlElement::with_text(tag, &self.name));
                el.children.extend(description());
                el
            }
        };

        XmlElement::new("commit-all").child(body)
    }

    pub fn to_payload(&self) -> CommitPayload {
        CommitPayload {
            cmd: self.to_element(),
            action: Some("all"),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Gate, build, submit and await a push.
///
/// Submission and wait failures are reported with severity chosen by
/// `spec.fail_on_error`. Returns the job handle when the push ran to
/// completion.
pub async fn push_to_devices<A: Appliance>(
    session: &Session<'_, A>,
    mut spec: PushSpec,
    diags: &mut Diagnostics,
) -> Option<JobHandle> {
    let kind = gate_push_flags(&mut spec, diags)?;
    let payload = PushPayload::new(kind, &spec);
    debug!(
        push_type = kind.internal_name(),
        name = %payload.name,
        devices = payload.devices.len(),
        "pushing configuration to devices"
    );

    let handle = match job::submit(session, &payload.to_payload()).await {
        Ok(handle) => handle,
        Err(e) => {
            if !spec.fail_on_error {
                warn!(error = %e, "push submission failed");
            }
            diags.add_core_error(spec.fail_on_error, PUSH_SUBMIT_FAILED, &e);
            return None;
        }
    };

    if let Err(e) = job::wait(session, handle).await {
        if !spec.fail_on_error {
            warn!(job_id = %handle, error = %e, "push job failed");
        }
        diags.add_core_error(spec.fail_on_error, PUSH_WAIT_FAILED, &e);
        return None;
    }

    Some(handle)
}
