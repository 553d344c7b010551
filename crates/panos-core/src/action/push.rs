// Standalone push-to-devices action.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::action::ActionReport;
use crate::appliance::Appliance;
use crate::diagnostics::{AttributePath, Diagnostic, Diagnostics, Severity};
use crate::push::{PushSpec, push_to_devices};
use crate::session::Session;
use crate::value::{AttrValue, StringCollection};

pub const MISSING_PUSH_ATTRIBUTE: &str = "Missing push configuration attribute";

/// Host model of a push (also the commit action's `push_configuration`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PushModel {
    #[serde(rename = "type")]
    pub push_type: AttrValue<String>,
    pub name: AttrValue<String>,
    pub description: AttrValue<String>,
    pub include_template: AttrValue<bool>,
    pub force_template_values: AttrValue<bool>,
    pub devices: StringCollection,
}

impl PushModel {
    /// Coerce into a push spec. Only collection conversion can fail here;
    /// missing `type`/`name` are left to the caller's policy.
    ///
    /// `prefix` is the attribute holding this model, `None` when the
    /// model is the action's top level.
    pub(crate) fn to_spec(
        &self,
        prefix: Option<&AttributePath>,
        fail_on_error: bool,
    ) -> Result<PushSpec, Diagnostic> {
        Ok(PushSpec {
            push_type: self.push_type.coerce_or_default(),
            name: self.name.coerce_or_default(),
            description: self.description.coerce(),
            include_template: self.include_template.coerce_or_default(),
            force_template_values: self.force_template_values.coerce_or_default(),
            devices: self.devices.coerce_list(&AttributePath::under(prefix, "devices"))?,
            fail_on_error,
            prefix: prefix.cloned(),
        })
    }

    /// Report `type` and `name` that are not set to a usable value.
    /// Returns whether both are usable.
    pub(crate) fn check_required(
        &self,
        prefix: Option<&AttributePath>,
        fail_on_error: bool,
        diags: &mut Diagnostics,
    ) -> bool {
        let mut complete = true;
        for (field, value) in [("type", &self.push_type), ("name", &self.name)] {
            let problem = match value {
                AttrValue::Known(v) if !v.is_empty() => continue,
                AttrValue::Known(_) => "must not be empty",
                AttrValue::Null => "is required",
                AttrValue::Unknown => "must be known before the push can run",
            };
            diags.push(
                Diagnostic::new(
                    Severity::for_policy(fail_on_error),
                    MISSING_PUSH_ATTRIBUTE,
                    format!("{field} {problem}"),
                )
                .at(AttributePath::under(prefix, field)),
            );
            complete = false;
        }
        complete
    }
}

/// Push configuration from Panorama to managed devices.
///
/// Failures are errors.
pub async fn run_push_action<A: Appliance>(
    session: &Session<'_, A>,
    model: &PushModel,
) -> ActionReport {
    let mut report = ActionReport::default();

    if !model.check_required(None, true, &mut report.diagnostics) {
        return report;
    }

    let spec = match model.to_spec(None, true) {
        Ok(spec) => spec,
        Err(diag) => {
            report.diagnostics.push(diag);
            return report;
        }
    };

    report.push_job = push_to_devices(session, spec, &mut report.diagnostics).await;
    if let Some(job) = report.push_job {
        info!(job_id = %job, "push to devices completed");
    }
    report
}
