// panos-core: Commit/push orchestration between panos-api and the host.

pub mod action;
pub mod appliance;
pub mod commit;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod import_id;
pub mod job;
pub mod position;
pub mod push;
pub mod role;
pub mod session;
pub mod value;
pub mod vm_auth_key;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::{ActionReport, CommitModel, PushModel, run_commit_action, run_push_action};
pub use appliance::{Appliance, connect};
pub use commit::{CommitParams, CommitRequest, FirewallCommit, ManagerCommit, build_commit};
pub use config::{ApplianceConfig, AuthCredentials, TlsVerification};
pub use diagnostics::{AttributePath, Diagnostic, Diagnostics, Severity};
pub use error::CoreError;
pub use import_id::{ImportIdError, ImportIdRegistry, decode_import_id};
pub use job::{CommitPayload, JobHandle};
pub use position::{PositionInput, RulePosition, Where};
pub use push::{PushKind, PushPayload, PushSpec, gate_push_flags, push_to_devices};
pub use role::DeviceRole;
pub use session::Session;
pub use value::{AttrValue, StringCollection};
pub use vm_auth_key::{VmAuthKey, generate_vm_auth_key, parse_vm_auth_key};

// Transport types callers need alongside the core API.
pub use panos_api::{Job, SystemInfo, XmlApiClient, XmlElement};
