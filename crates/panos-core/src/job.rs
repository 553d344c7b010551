// ── Job runner ──
//
// Submit a commit-type payload, then poll the resulting job until it
// finishes. One submission per call, no retries. Poll interval and
// cancellation come from the session.

use std::fmt;

use panos_api::{Job, XmlElement};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::appliance::Appliance;
use crate::error::CoreError;
use crate::session::Session;

/// Appliance job id. Zero means nothing was scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct JobHandle(u64);

impl JobHandle {
    pub const NONE: Self = Self(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }

    /// Whether a job was scheduled (and so must be awaited).
    pub fn is_scheduled(self) -> bool {
        self.0 > 0
    }
}

impl From<Option<u64>> for JobHandle {
    fn from(id: Option<u64>) -> Self {
        Self(id.unwrap_or(0))
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A commit-type command ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPayload {
    pub cmd: XmlElement,
    /// `Some("all")` for Panorama commit-all.
    pub action: Option<&'static str>,
}

/// Submit a payload. Any transport failure is `SubmitFailed`.
pub async fn submit<A: Appliance>(
    session: &Session<'_, A>,
    payload: &CommitPayload,
) -> Result<JobHandle, CoreError> {
    debug!(command = %payload.cmd.tag, action = ?payload.action, "submitting job");
    let id = session
        .call(session.appliance().commit(&payload.cmd, payload.action))
        .await
        .map_err(submit_failed)?;
    let handle = JobHandle::from(id);
    if handle.is_scheduled() {
        debug!(job_id = %handle, "job scheduled");
    } else {
        debug!("appliance scheduled no job");
    }
    Ok(handle)
}

/// Poll a job until it finishes. A handle of zero returns immediately
/// without touching the appliance.
///
/// There is no deadline: the loop ends on completion, a polling failure
/// or cancellation.
pub async fn wait<A: Appliance>(
    session: &Session<'_, A>,
    handle: JobHandle,
) -> Result<Option<Job>, CoreError> {
    if !handle.is_scheduled() {
        return Ok(None);
    }
    let id = handle.id();

    loop {
        let job = session
            .call(session.appliance().show_job(id))
            .await
            .map_err(|e| wait_failed(id, e))?;

        if job.is_finished() {
            for line in &job.warnings {
                warn!(job_id = id, warning = %line, "job reported a warning");
            }
            if job.succeeded() {
                info!(job_id = id, job_type = ?job.job_type, "job completed");
                return Ok(Some(job));
            }
            let message = if job.details.is_empty() {
                "job finished with a failing result".to_owned()
            } else {
                job.details.join("\n")
            };
            return Err(CoreError::WaitFailed {
                job_id: id,
                message,
            });
        }

        debug!(job_id = id, status = ?job.status, progress = ?job.progress, "job in progress");
        session.pause().await?;
    }
}

/// `submit` followed by `wait`.
pub async fn run<A: Appliance>(
    session: &Session<'_, A>,
    payload: &CommitPayload,
) -> Result<JobHandle, CoreError> {
    let handle = submit(session, payload).await?;
    wait(session, handle).await?;
    Ok(handle)
}

fn submit_failed(err: CoreError) -> CoreError {
    match err {
        CoreError::Cancelled => CoreError::Cancelled,
        other => CoreError::SubmitFailed {
            message: other.to_string(),
        },
    }
}

fn wait_failed(job_id: u64, err: CoreError) -> CoreError {
    match err {
        CoreError::Cancelled => CoreError::Cancelled,
        other => CoreError::WaitFailed {
            job_id,
            message: other.to_string(),
        },
    }
}
