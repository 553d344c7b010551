//! Rule position validation. Runs offline.

use serde::Serialize;

use panos_core::{AttributePath, Diagnostics, PositionInput, RulePosition};

use crate::cli::{GlobalOpts, PositionArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct PositionView {
    diagnostics: Diagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<Resolved>,
    #[serde(skip_serializing_if = "Option::is_none")]
    satisfied: Option<bool>,
}

/// XML API move target for the resolved position.
#[derive(Serialize)]
struct Resolved {
    #[serde(rename = "where")]
    where_: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dst: Option<String>,
    directly: bool,
}

impl From<&RulePosition> for Resolved {
    fn from(position: &RulePosition) -> Self {
        let (where_, dst) = position.move_target();
        Self {
            where_,
            dst: dst.map(str::to_owned),
            directly: matches!(
                position,
                RulePosition::DirectlyBefore(_) | RulePosition::DirectlyAfter(_)
            ),
        }
    }
}

pub fn handle(args: &PositionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let input: PositionInput = util::read_json(&args.file)?;

    let mut diagnostics = Diagnostics::new();
    input.validate(&AttributePath::root("position"), &mut diagnostics);

    let position = input.to_position();
    let satisfied = match &position {
        Some(p) if !args.order.is_empty() => Some(p.is_satisfied(args.order.as_slice(), args.rules.as_slice())),
        _ => None,
    };
    let view = PositionView {
        resolved: position.as_ref().map(Resolved::from),
        satisfied,
        diagnostics,
    };

    let out = output::render_single(global.output, &view, |v| {
        let mut lines: Vec<String> = v.diagnostics.iter().map(ToString::to_string).collect();
        if let Some(ref r) = v.resolved {
            let mut pairs = vec![("Where", r.where_.to_owned())];
            if let Some(ref dst) = r.dst {
                pairs.push(("Pivot", dst.clone()));
                pairs.push(("Directly", r.directly.to_string()));
            }
            if let Some(satisfied) = v.satisfied {
                pairs.push(("Satisfied", satisfied.to_string()));
            }
            lines.push(output::render_pairs(&pairs));
        }
        lines.join("\n")
    });
    output::print_output(&out, global.quiet);
    util::check_diagnostics(&view.diagnostics)
}
