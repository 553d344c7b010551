// Commit action: commit on the appliance, then optionally push from
// Panorama to managed devices.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::action::ActionReport;
use crate::action::push::PushModel;
use crate::appliance::Appliance;
use crate::commit::{CommitParams, build_commit, validate_for_role};
use crate::diagnostics::{AttributePath, Diagnostic};
use crate::job;
use crate::push::push_to_devices;
use crate::role::DeviceRole;
use crate::session::Session;
use crate::value::{AttrValue, StringCollection};

pub const ROLE_PROBE_FAILED: &str = "Failed to detect device type";
pub const COMMIT_SUBMIT_FAILED: &str = "Failed to commit configuration";
pub const COMMIT_WAIT_FAILED: &str = "Commit job failed";
pub const PUSH_NOT_AVAILABLE: &str = "Push not available on firewall";

/// Host model of the commit action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitModel {
    pub description: AttrValue<String>,
    pub admins: StringCollection,
    pub exclude_device_and_network: AttrValue<bool>,
    pub exclude_shared_objects: AttrValue<bool>,
    pub exclude_policy_and_objects: AttrValue<bool>,
    pub force: AttrValue<bool>,
    pub device_groups: StringCollection,
    pub templates: StringCollection,
    pub template_stacks: StringCollection,
    pub wildfire_appliances: StringCollection,
    pub wildfire_clusters: StringCollection,
    pub log_collectors: StringCollection,
    pub log_collector_groups: StringCollection,
    pub push_configuration: AttrValue<PushModel>,
}

impl CommitModel {
    /// Coerce into native commit parameters. The first collection that
    /// fails to convert aborts coercion.
    pub fn to_params(&self) -> Result<CommitParams, Diagnostic> {
        let set = |name: &str, value: &StringCollection| value.coerce_set(&AttributePath::root(name));
        Ok(CommitParams {
            description: self.description.coerce(),
            admins: set("admins", &self.admins)?,
            device_groups: set("device_groups", &self.device_groups)?,
            templates: set("templates", &self.templates)?,
            template_stacks: set("template_stacks", &self.template_stacks)?,
            wildfire_appliances: set("wildfire_appliances", &self.wildfire_appliances)?,
            wildfire_clusters: set("wildfire_clusters", &self.wildfire_clusters)?,
            log_collectors: set("log_collectors", &self.log_collectors)?,
            log_collector_groups: set("log_collector_groups", &self.log_collector_groups)?,
            exclude_device_and_network: self.exclude_device_and_network.coerce_or_default(),
            exclude_shared_objects: self.exclude_shared_objects.coerce_or_default(),
            exclude_policy_and_objects: self.exclude_policy_and_objects.coerce_or_default(),
            force: self.force.coerce_or_default(),
        })
    }
}

/// Commit, then push when `push_configuration` is set on Panorama.
///
/// The push runs with `fail_on_error = false`: once the commit has
/// succeeded, push problems are reported as warnings.
pub async fn run_commit_action<A: Appliance>(
    session: &Session<'_, A>,
    model: &CommitModel,
) -> ActionReport {
    let mut report = ActionReport::default();
    let diags = &mut report.diagnostics;

    let role = match session.role().await {
        Ok(role) => role,
        Err(e) => {
            diags.add_core_error(true, ROLE_PROBE_FAILED, &e);
            return report;
        }
    };

    let push_path = AttributePath::root("push_configuration");
    let coerced = model.to_params().and_then(|params| {
        let push = match &model.push_configuration {
            AttrValue::Known(push) => Some((push, push.to_spec(Some(&push_path), false)?)),
            AttrValue::Null | AttrValue::Unknown => None,
        };
        Ok((params, push))
    });
    let (params, push) = match coerced {
        Ok(coerced) => coerced,
        Err(diag) => {
            diags.push(diag);
            return report;
        }
    };

    validate_for_role(role, &params, diags);
    if diags.has_error() {
        return report;
    }

    // ── Commit ───────────────────────────────────────────────────────
    let payload = build_commit(role, &params).to_payload();
    let handle = match job::submit(session, &payload).await {
        Ok(handle) => handle,
        Err(e) => {
            diags.add_core_error(true, COMMIT_SUBMIT_FAILED, &e);
            return report;
        }
    };
    if let Err(e) = job::wait(session, handle).await {
        diags.add_core_error(true, COMMIT_WAIT_FAILED, &e);
        return report;
    }
    if handle.is_scheduled() {
        info!(job_id = %handle, %role, "commit completed");
        report.commit_job = Some(handle);
    } else {
        info!(%role, "nothing to commit");
    }

    // ── Push ─────────────────────────────────────────────────────────
    let Some((push_model, spec)) = push else {
        return report;
    };
    if role == DeviceRole::Firewall {
        diags.add_attribute_error(
            push_path,
            PUSH_NOT_AVAILABLE,
            "push_configuration can only be used when committing on Panorama",
        );
        return report;
    }

    if !push_model.check_required(Some(&push_path), false, diags) {
        warn!("push configuration incomplete, skipping push");
        return report;
    }

    report.push_job = push_to_devices(session, spec, &mut report.diagnostics).await;
    report
}
