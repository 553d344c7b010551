//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use panos_core::Diagnostics;

use crate::error::CliError;

/// Read a JSON document from `path`, or stdin for `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&contents)?)
}

/// Read an action model; no file means the model's defaults.
pub fn read_model<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, CliError> {
    path.map_or_else(|| Ok(T::default()), read_json::<T>)
}

/// Diagnostics with an error become a failing exit status.
pub fn check_diagnostics(diags: &Diagnostics) -> Result<(), CliError> {
    match diags.errors().count() {
        0 => Ok(()),
        errors => Err(CliError::ActionFailed { errors }),
    }
}
