//! Import id handlers. These run offline.

use serde::Serialize;

use panos_core::{ImportIdRegistry, decode_import_id};

use crate::cli::{GlobalOpts, ImportIdArgs, ImportIdCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct ImportIdView<'a> {
    resource: &'a str,
    import_id: String,
}

pub fn handle(args: ImportIdArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let registry = ImportIdRegistry::with_defaults();
    let out = match args.command {
        ImportIdCommand::Generate { resource, file } => {
            let object: serde_json::Value = util::read_json(&file)?;
            let view = ImportIdView {
                import_id: registry.generate(&resource, &object)?,
                resource: &resource,
            };
            output::render_single(global.output, &view, |v| v.import_id.clone())
        }
        ImportIdCommand::Decode { id } => {
            let object = decode_import_id(&id)?;
            output::render_single(global.output, &object, |v| {
                serde_json::to_string_pretty(v).unwrap_or_default()
            })
        }
        ImportIdCommand::Resources => {
            let resources: Vec<&str> = registry.resources().collect();
            output::render_single(global.output, &resources, |r| r.join("\n"))
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
