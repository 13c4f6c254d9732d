//! Command endpoint derivation.

/// Path of the command gateway relative to the hub's base address.
pub const COMMAND_PATH: &str = "/api/actuators/command";

/// Full URL of the command gateway for the hub reachable at `base`.
///
/// Trailing slashes of `base` are dropped so `http://hub/` and `http://hub`
/// resolve to the same endpoint.
#[must_use]
pub fn resolve_endpoint(base: &str) -> String {
    format!("{}{COMMAND_PATH}", base.trim().trim_end_matches('/'))
}
