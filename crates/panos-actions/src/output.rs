//! Output formatting: table, JSON, YAML.
//!
//! Table uses `tabled`, structured formats use serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use panos_core::{ActionReport, Diagnostic, Severity};

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single items don't derive
/// `Tabled`.
pub fn render_single<T: Serialize>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> String {
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Action reports ───────────────────────────────────────────────────

#[derive(Tabled)]
struct DiagnosticRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "Attribute")]
    attribute: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl DiagnosticRow {
    fn new(diag: &Diagnostic, color: bool) -> Self {
        let severity = diag.severity.to_string();
        let severity = match (color, diag.severity) {
            (false, _) => severity,
            (true, Severity::Error) => severity.red().bold().to_string(),
            (true, Severity::Warning) => severity.yellow().to_string(),
        };
        Self {
            severity,
            summary: diag.summary.clone(),
            attribute: diag
                .attribute
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            detail: diag.detail.clone(),
        }
    }
}

pub fn render_report(format: OutputFormat, report: &ActionReport, color: bool) -> String {
    render_single(format, report, |r| report_detail(r, color))
}

fn report_detail(report: &ActionReport, color: bool) -> String {
    let mut lines = Vec::new();
    if let Some(job) = report.commit_job {
        lines.push(format!("Commit job: {job}"));
    }
    if let Some(job) = report.push_job {
        lines.push(format!("Push job:   {job}"));
    }
    if !report.diagnostics.is_empty() {
        let rows: Vec<DiagnosticRow> = report
            .diagnostics
            .iter()
            .map(|d| DiagnosticRow::new(d, color))
            .collect();
        lines.push(render_table(&rows));
    }
    if lines.is_empty() {
        lines.push("Nothing to do".into());
    }
    lines.join("\n")
}

/// Two-column key/value detail view.
pub fn render_pairs(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.expect("serialization should not fail")
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use panos_core::{Diagnostics, JobHandle};

    use super::*;

    #[test]
    fn table_lists_jobs_and_diagnostics() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_warning("include_template ignored", "not valid for template pushes");
        let report = ActionReport {
            diagnostics,
            commit_job: Some(JobHandle::new(42)),
            push_job: None,
        };
        let out = render_report(OutputFormat::Table, &report, false);
        assert!(out.starts_with("Commit job: 42"));
        assert!(out.contains("include_template ignored"));
        assert!(out.contains("warning"));
    }

    #[test]
    fn json_report_is_machine_readable() {
        let report = ActionReport {
            commit_job: Some(JobHandle::new(7)),
            ..ActionReport::default()
        };
        let out = render_report(OutputFormat::JsonCompact, &report, false);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["commit_job"], 7);
        assert_eq!(value["diagnostics"], serde_json::json!([]));
        assert!(value.get("push_job").is_none());
    }

    #[test]
    fn pairs_align() {
        let out = render_pairs(&[("Role", "firewall".into()), ("Hostname", "fw01".into())]);
        assert_eq!(out, "Role      firewall\nHostname  fw01");
    }
}
