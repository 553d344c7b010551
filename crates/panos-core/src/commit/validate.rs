// Role-aware commit parameter checks.

use crate::commit::CommitParams;
use crate::diagnostics::{AttributePath, Diagnostics};
use crate::role::DeviceRole;

pub const INVALID_FOR_FIREWALL: &str = "Invalid parameters for firewall";
pub const INVALID_FOR_MANAGER: &str = "Invalid parameter for Panorama";

/// Reject parameter combinations the detected role cannot accept.
///
/// Every violation is a fatal error; callers stop when
/// `diags.has_error()` afterwards.
pub fn validate_for_role(role: DeviceRole, params: &CommitParams, diags: &mut Diagnostics) {
    match role {
        DeviceRole::Firewall => {
            let offending: Vec<&str> = params
                .manager_scopes()
                .into_iter()
                .filter(|(_, values)| !values.is_empty())
                .map(|(name, _)| name)
                .collect();
            if !offending.is_empty() {
                diags.add_error(
                    INVALID_FOR_FIREWALL,
                    format!(
                        "{} can only be used when committing on Panorama",
                        offending.join(", ")
                    ),
                );
            }
        }
        DeviceRole::Manager => {
            if params.exclude_policy_and_objects {
                diags.add_attribute_error(
                    AttributePath::root("exclude_policy_and_objects"),
                    INVALID_FOR_MANAGER,
                    "exclude_policy_and_objects can only be used when committing on a firewall",
                );
            }
        }
    }
}
