// Scripted in-memory appliance shared by the integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;

use panos_api::{Job, JobResult, JobStatus, SystemInfo, XmlElement};
use panos_core::{Appliance, CoreError};

/// What the fake does when a commit is submitted.
pub enum CommitReply {
    Job(u64),
    NoJob,
    Fail(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SystemInfo,
    Commit { cmd: String, action: Option<&'static str> },
    ShowJob(u64),
    Op(String),
}

pub struct FakeAppliance {
    model: String,
    commits: Mutex<VecDeque<CommitReply>>,
    jobs: Mutex<VecDeque<Job>>,
    op_result: Mutex<Option<XmlElement>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeAppliance {
    pub fn firewall() -> Self {
        Self::with_model("PA-VM")
    }

    pub fn panorama() -> Self {
        Self::with_model("Panorama")
    }

    fn with_model(model: &str) -> Self {
        Self {
            model: model.to_owned(),
            commits: Mutex::new(VecDeque::new()),
            jobs: Mutex::new(VecDeque::new()),
            op_result: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_commit(self, reply: CommitReply) -> Self {
        self.commits.lock().unwrap().push_back(reply);
        self
    }

    /// Queue one `show jobs` answer.
    pub fn on_show_job(self, job: Job) -> Self {
        self.jobs.lock().unwrap().push_back(job);
        self
    }

    pub fn on_op(self, result: XmlElement) -> Self {
        *self.op_result.lock().unwrap() = Some(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commits(&self) -> Vec<(String, Option<&'static str>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Commit { cmd, action } => Some((cmd, action)),
                _ => None,
            })
            .collect()
    }

    pub fn show_job_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ShowJob(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Appliance for FakeAppliance {
    async fn system_info(&self) -> Result<SystemInfo, CoreError> {
        self.record(Call::SystemInfo);
        Ok(SystemInfo {
            model: Some(self.model.clone()),
            ..SystemInfo::default()
        })
    }

    async fn commit(
        &self,
        cmd: &XmlElement,
        action: Option<&'static str>,
    ) -> Result<Option<u64>, CoreError> {
        self.record(Call::Commit {
            cmd: cmd.to_xml().unwrap(),
            action,
        });
        match self.commits.lock().unwrap().pop_front() {
            Some(CommitReply::Job(id)) => Ok(Some(id)),
            Some(CommitReply::NoJob) | None => Ok(None),
            Some(CommitReply::Fail(message)) => Err(CoreError::Api {
                message,
                code: None,
            }),
        }
    }

    async fn show_job(&self, id: u64) -> Result<Job, CoreError> {
        self.record(Call::ShowJob(id));
        let next = self.jobs.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| finished(id)))
    }

    async fn op(&self, cmd: &XmlElement) -> Result<XmlElement, CoreError> {
        self.record(Call::Op(cmd.to_xml().unwrap()));
        Ok(self
            .op_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| XmlElement::new("result")))
    }
}

// ── Job builders ─────────────────────────────────────────────────────

pub fn job(id: u64, status: JobStatus, result: JobResult) -> Job {
    Job {
        id,
        job_type: Some("Commit".into()),
        status,
        result,
        progress: None,
        details: Vec::new(),
        warnings: Vec::new(),
    }
}

pub fn finished(id: u64) -> Job {
    job(id, JobStatus::Finished, JobResult::Ok)
}

pub fn running(id: u64) -> Job {
    job(id, JobStatus::Active, JobResult::Pending)
}

pub fn failed(id: u64, detail: &str) -> Job {
    Job {
        details: vec![detail.to_owned()],
        ..job(id, JobStatus::Finished, JobResult::Fail)
    }
}
