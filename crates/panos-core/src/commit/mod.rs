// ── Commit command builder ──
//
// Role-specific commit payloads. Building is pure: (role, params) in,
// `CommitRequest` out. Sets serialize in sorted order so the same
// params always yield the same XML.

pub mod validate;

use std::collections::BTreeSet;

use panos_api::XmlElement;

use crate::job::CommitPayload;
use crate::role::DeviceRole;

pub use validate::validate_for_role;

/// Coerced commit parameters, independent of role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitParams {
    pub description: Option<String>,
    pub admins: BTreeSet<String>,
    pub device_groups: BTreeSet<String>,
    pub templates: BTreeSet<String>,
    pub template_stacks: BTreeSet<String>,
    pub wildfire_appliances: BTreeSet<String>,
    pub wildfire_clusters: BTreeSet<String>,
    pub log_collectors: BTreeSet<String>,
    pub log_collector_groups: BTreeSet<String>,
    pub exclude_device_and_network: bool,
    pub exclude_shared_objects: bool,
    pub exclude_policy_and_objects: bool,
    pub force: bool,
}

impl CommitParams {
    /// Manager-only scopes as (attribute name, values).
    pub fn manager_scopes(&self) -> [(&'static str, &BTreeSet<String>); 7] {
        [
            ("device_groups", &self.device_groups),
            ("templates", &self.templates),
            ("template_stacks", &self.template_stacks),
            ("wildfire_appliances", &self.wildfire_appliances),
            ("wildfire_clusters", &self.wildfire_clusters),
            ("log_collectors", &self.log_collectors),
            ("log_collector_groups", &self.log_collector_groups),
        ]
    }
}

/// Partial commit on a firewall.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirewallCommit {
    pub description: Option<String>,
    pub admins: BTreeSet<String>,
    pub exclude_device_and_network: bool,
    pub exclude_shared_objects: bool,
    pub exclude_policy_and_objects: bool,
    pub force: bool,
}

/// Partial commit on Panorama. Has no policy-and-objects exclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerCommit {
    pub description: Option<String>,
    pub admins: BTreeSet<String>,
    pub device_groups: BTreeSet<String>,
    pub templates: BTreeSet<String>,
    pub template_stacks: BTreeSet<String>,
    pub wildfire_appliances: BTreeSet<String>,
    pub wildfire_clusters: BTreeSet<String>,
    pub log_collectors: BTreeSet<String>,
    pub log_collector_groups: BTreeSet<String>,
    pub exclude_device_and_network: bool,
    pub exclude_shared_objects: bool,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRequest {
    Firewall(FirewallCommit),
    Manager(ManagerCommit),
}

/// Assemble the commit for `role`. Assumes `params` already passed
/// [`validate_for_role`]; fields foreign to the role are dropped.
pub fn build_commit(role: DeviceRole, params: &CommitParams) -> CommitRequest {
    match role {
        DeviceRole::Firewall => CommitRequest::Firewall(FirewallCommit {
            description: params.description.clone(),
            admins: params.admins.clone(),
            exclude_device_and_network: params.exclude_device_and_network,
            exclude_shared_objects: params.exclude_shared_objects,
            exclude_policy_and_objects: params.exclude_policy_and_objects,
            force: params.force,
        }),
        DeviceRole::Manager => CommitRequest::Manager(ManagerCommit {
            description: params.description.clone(),
            admins: params.admins.clone(),
            device_groups: params.device_groups.clone(),
            templates: params.templates.clone(),
            template_stacks: params.template_stacks.clone(),
            wildfire_appliances: params.wildfire_appliances.clone(),
            wildfire_clusters: params.wildfire_clusters.clone(),
            log_collectors: params.log_collectors.clone(),
            log_collector_groups: params.log_collector_groups.clone(),
            exclude_device_and_network: params.exclude_device_and_network,
            exclude_shared_objects: params.exclude_shared_objects,
            force: params.force,
        }),
    }
}

impl CommitRequest {
    pub fn role(&self) -> DeviceRole {
        match self {
            Self::Firewall(_) => DeviceRole::Firewall,
            Self::Manager(_) => DeviceRole::Manager,
        }
    }

    /// `<commit>[<force>]<description/><partial/>[</force>]</commit>`
    pub fn to_element(&self) -> XmlElement {
        let (description, force, partial) = match self {
            Self::Firewall(c) => {
                let mut partial = Partial::default();
                partial.members("admin", &c.admins);
                partial.excluded("device-and-network", c.exclude_device_and_network);
                partial.excluded("shared-object", c.exclude_shared_objects);
                partial.excluded("policy-and-objects", c.exclude_policy_and_objects);
                (c.description.as_deref(), c.force, partial)
            }
            Self::Manager(c) => {
                let mut partial = Partial::default();
                partial.members("admin", &c.admins);
                partial.members("device-group", &c.device_groups);
                partial.members("template", &c.templates);
                partial.members("template-stack", &c.template_stacks);
                partial.members("wildfire-appliance", &c.wildfire_appliances);
                partial.members("wildfire-appliance-cluster", &c.wildfire_clusters);
                partial.members("log-collector", &c.log_collectors);
                partial.members("log-collector-group", &c.log_collector_groups);
                partial.excluded("device-and-network", c.exclude_device_and_network);
                partial.excluded("shared-object", c.exclude_shared_objects);
                (c.description.as_deref(), c.force, partial)
            }
        };

        let mut body = Vec::new();
        if let Some(desc) = description.filter(|d| !d.is_empty()) {
            body.push(XmlElement::with_text("description", desc));
        }
        if !partial.0.is_empty() {
            let mut el = XmlElement::new("partial");
            el.children = partial.0;
            body.push(el);
        }

        let mut commit = XmlElement::new("commit");
        if force {
            let mut force_el = XmlElement::new("force");
            force_el.children = body;
            commit.push(force_el);
        } else {
            commit.children = body;
        }
        commit
    }

    pub fn to_payload(&self) -> CommitPayload {
        CommitPayload {
            cmd: self.to_element(),
            action: None,
        }
    }
}

/// Children of `<partial>`, in emission order.
#[derive(Default)]
struct Partial(Vec<XmlElement>);

impl Partial {
    fn members(&mut self, tag: &str, values: &BTreeSet<String>) {
        if !values.is_empty() {
            self.0.push(XmlElement::members(tag, values.iter().cloned()));
        }
    }

    fn excluded(&mut self, tag: &str, set: bool) {
        if set {
            self.0.push(XmlElement::with_text(tag, "excluded"));
        }
    }
}
