//! Command dispatch: bridges CLI args -> core actions -> output formatting.

pub mod actions;
pub mod import_id;
pub mod position;
pub mod system;
pub mod util;
pub mod vm_auth_key;

use panos_core::{Session, XmlApiClient};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an appliance-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session<'_, XmlApiClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = match cmd {
        Command::Commit(args) => actions::commit(session, &args, global).await,
        Command::Push(args) => actions::push(session, &args, global).await,
        Command::VmAuthKey(args) => vm_auth_key::handle(session, &args, global).await,
        Command::SystemInfo => system::handle(session, global).await,
        // Offline commands are handled before a session exists
        Command::ImportId(_) | Command::Position(_) | Command::Completions(_) => {
            return Err(CliError::Validation {
                field: "command".into(),
                reason: "command does not take an appliance session".into(),
            });
        }
    };

    if session.cancel_token().is_cancelled() {
        return Err(CliError::Cancelled);
    }
    result
}
