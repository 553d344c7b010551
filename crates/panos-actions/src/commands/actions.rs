//! Commit and push action handlers.

use panos_core::{
    ActionReport, CommitModel, PushModel, Session, XmlApiClient, run_commit_action,
    run_push_action,
};
use tracing::info;

use crate::cli::{GlobalOpts, ModelArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn commit(
    session: &Session<'_, XmlApiClient>,
    args: &ModelArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let model: CommitModel = util::read_model(args.file.as_deref())?;
    let report = run_commit_action(session, &model).await;
    finish(&report, global)
}

pub async fn push(
    session: &Session<'_, XmlApiClient>,
    args: &ModelArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let model: PushModel = util::read_model(args.file.as_deref())?;
    let report = run_push_action(session, &model).await;
    finish(&report, global)
}

fn finish(report: &ActionReport, global: &GlobalOpts) -> Result<(), CliError> {
    info!(
        commit_job = ?report.commit_job,
        push_job = ?report.push_job,
        diagnostics = report.diagnostics.len(),
        "action finished"
    );
    let color = output::should_color(global.color);
    output::print_output(&output::render_report(global.output, report, color), global.quiet);
    util::check_diagnostics(&report.diagnostics)
}
