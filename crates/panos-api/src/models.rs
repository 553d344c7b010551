// Typed views over XML API `<result>` payloads.
//
// The appliance returns loosely structured XML whose field set varies by
// platform and PAN-OS version, so these are hand-extracted from the
// element tree rather than derived.

use serde::Serialize;

use crate::error::Error;
use crate::xml::XmlElement;

// ── System info ─────────────────────────────────────────────────────

/// Subset of `show system info` used for role detection and display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub hostname: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub sw_version: Option<String>,
    /// Panorama only: `panorama`, `management-only`, `logger`.
    pub system_mode: Option<String>,
    pub ip_address: Option<String>,
}

impl SystemInfo {
    /// Extract from the `<result>` element of `show system info`.
    pub fn from_result(result: &XmlElement) -> Result<Self, Error> {
        let system = result.find("system").ok_or_else(|| Error::Deserialization {
            message: "system info response has no <system> element".into(),
            body: result.to_xml().unwrap_or_default(),
        })?;
        let field = |tag: &str| system.text_at(tag).map(str::to_owned);
        Ok(Self {
            hostname: field("hostname"),
            model: field("model"),
            serial: field("serial"),
            sw_version: field("sw-version"),
            system_mode: field("system-mode"),
            ip_address: field("ip-address"),
        })
    }
}

// ── Jobs ────────────────────────────────────────────────────────────

/// Lifecycle state reported in `<job><status>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// `ACT`
    Active,
    /// `PEND`
    Pending,
    /// `FIN`
    Finished,
}

/// Outcome reported in `<job><result>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobResult {
    Ok,
    Fail,
    Pending,
}

/// One asynchronous appliance job, as returned by `show jobs id N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: u64,
    pub job_type: Option<String>,
    pub status: JobStatus,
    pub result: JobResult,
    pub progress: Option<u8>,
    pub details: Vec<String>,
    pub warnings: Vec<String>,
}

impl Job {
    pub fn is_finished(&self) -> bool {
        self.status == JobStatus::Finished
    }

    pub fn succeeded(&self) -> bool {
        self.is_finished() && self.result == JobResult::Ok
    }

    /// Extract from the `<result>` element of `show jobs id N`.
    pub fn from_result(result: &XmlElement) -> Result<Self, Error> {
        let bad = |message: String| Error::Deserialization {
            message,
            body: result.to_xml().unwrap_or_default(),
        };
        let job = result
            .find("job")
            .ok_or_else(|| bad("job response has no <job> element".into()))?;

        let id = job
            .text_at("id")
            .ok_or_else(|| bad("job has no <id>".into()))?
            .parse::<u64>()
            .map_err(|e| bad(format!("invalid job id: {e}")))?;

        let status = match job.text_at("status") {
            Some("FIN") => JobStatus::Finished,
            Some("ACT") => JobStatus::Active,
            Some("PEND") | None => JobStatus::Pending,
            Some(other) => return Err(bad(format!("unknown job status {other:?}"))),
        };

        let result_state = match job.text_at("result") {
            Some("OK") => JobResult::Ok,
            Some("FAIL") => JobResult::Fail,
            _ => JobResult::Pending,
        };

        let progress = job.text_at("progress").and_then(|p| p.parse::<u8>().ok());

        Ok(Self {
            id,
            job_type: job.text_at("type").map(str::to_owned),
            status,
            result: result_state,
            progress,
            details: lines(job.find("details")),
            warnings: lines(job.find("warnings")),
        })
    }
}

/// Collect `<line>` children (or bare text) of an optional element.
fn lines(el: Option<&XmlElement>) -> Vec<String> {
    let Some(el) = el else {
        return Vec::new();
    };
    let from_lines: Vec<String> = el
        .find_all("line")
        .map(|l| l.flatten_text(" "))
        .filter(|l| !l.is_empty())
        .collect();
    if !from_lines.is_empty() {
        return from_lines;
    }
    let text = el.flatten_text(" ");
    if text.is_empty() { Vec::new() } else { vec![text] }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::xml::parse;

    #[test]
    fn system_info_extracts_known_fields() {
        let result = parse(
            "<result><system><hostname>pano</hostname><model>Panorama</model>\
             <serial>0001</serial><sw-version>11.1.2</sw-version>\
             <system-mode>panorama</system-mode></system></result>",
        )
        .unwrap();
        let info = SystemInfo::from_result(&result).unwrap();
        assert_eq!(info.model.as_deref(), Some("Panorama"));
        assert_eq!(info.sw_version.as_deref(), Some("11.1.2"));
        assert_eq!(info.system_mode.as_deref(), Some("panorama"));
        assert!(info.ip_address.is_none());
    }

    #[test]
    fn finished_failed_job_keeps_detail_lines() {
        let result = parse(
            "<result><job><id>42</id><type>Commit</type><status>FIN</status>\
             <result>FAIL</result><progress>100</progress>\
             <details><line>Validation Error:</line><line>rule1 is invalid</line></details>\
             </job></result>",
        )
        .unwrap();
        let job = Job::from_result(&result).unwrap();
        assert_eq!(job.id, 42);
        assert!(job.is_finished());
        assert!(!job.succeeded());
        assert_eq!(job.details, vec!["Validation Error:", "rule1 is invalid"]);
        assert!(job.warnings.is_empty());
    }

    #[test]
    fn active_job_is_not_finished() {
        let result = parse(
            "<result><job><id>7</id><status>ACT</status><result>PEND</result>\
             <progress>55</progress></job></result>",
        )
        .unwrap();
        let job = Job::from_result(&result).unwrap();
        assert_eq!(job.status, JobStatus::Active);
        assert_eq!(job.result, JobResult::Pending);
        assert_eq!(job.progress, Some(55));
    }

    #[test]
    fn job_without_id_is_rejected() {
        let result = parse("<result><job><status>FIN</status></job></result>").unwrap();
        assert!(Job::from_result(&result).is_err());
    }
}
