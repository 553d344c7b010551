//! VM auth key handler.

use serde::Serialize;

use panos_core::{Diagnostics, Session, VmAuthKey, XmlApiClient, generate_vm_auth_key};

use crate::cli::{GlobalOpts, VmAuthKeyArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct VmAuthKeyView<'a> {
    #[serde(flatten)]
    key: Option<&'a VmAuthKey>,
    diagnostics: &'a Diagnostics,
}

pub async fn handle(
    session: &Session<'_, XmlApiClient>,
    args: &VmAuthKeyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut diags = Diagnostics::new();
    let key = generate_vm_auth_key(session, args.lifetime_hours, &mut diags).await;

    let view = VmAuthKeyView {
        key: key.as_ref(),
        diagnostics: &diags,
    };
    let out = output::render_single(global.output, &view, |v| {
        let mut lines = Vec::new();
        if let Some(key) = v.key {
            lines.push(output::render_pairs(&[
                ("VM auth key", key.vm_auth_key.clone()),
                (
                    "Expires",
                    key.expiration_date.clone().unwrap_or_else(|| "-".into()),
                ),
            ]));
        }
        lines.extend(v.diagnostics.iter().map(ToString::to_string));
        lines.join("\n")
    });
    output::print_output(&out, global.quiet);
    util::check_diagnostics(&diags)
}
