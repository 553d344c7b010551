//! System info handler.

use serde::Serialize;

use panos_core::{Appliance, DeviceRole, Session, SystemInfo, XmlApiClient};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct SystemInfoView {
    role: DeviceRole,
    #[serde(flatten)]
    info: SystemInfo,
}

pub async fn handle(
    session: &Session<'_, XmlApiClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let info = session.call(Appliance::system_info(session.appliance())).await?;
    let view = SystemInfoView {
        role: DeviceRole::from_system_info(&info),
        info,
    };

    let out = output::render_single(global.output, &view, |v| {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());
        output::render_pairs(&[
            ("Role", v.role.to_string()),
            ("Hostname", field(&v.info.hostname)),
            ("Model", field(&v.info.model)),
            ("Serial", field(&v.info.serial)),
            ("Version", field(&v.info.sw_version)),
            ("Mode", field(&v.info.system_mode)),
            ("Address", field(&v.info.ip_address)),
        ])
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
