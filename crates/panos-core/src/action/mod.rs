// ── Actions ──
//
// Host-invoked entry points. Each action takes its host model (three-
// valued fields), runs against one session and returns every diagnostic
// it produced plus the jobs it ran. Actions never return `Err`: failures
// are diagnostics.

pub mod commit;
pub mod push;

use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::job::JobHandle;

pub use commit::{CommitModel, run_commit_action};
pub use push::{PushModel, run_push_action};

/// Result of one action invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub diagnostics: Diagnostics,
    /// Commit job, if one was scheduled and completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_job: Option<JobHandle>,
    /// Push job, if one was scheduled and completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_job: Option<JobHandle>,
}

impl ActionReport {
    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}
