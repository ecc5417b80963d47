//! Shared helpers for command handlers.

use stamgr_api::ApiData;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Report a completed station command: the controller's data in structured
/// formats, a success line otherwise.
pub fn report(data: &ApiData, message: &str, global: &GlobalOpts, format: &OutputFormat) {
    match output::render_structured(format, data) {
        Some(out) => output::print_output(&out, global.quiet),
        None => output::print_success(message, global.quiet),
    }
}

/// Validate a MAC argument and normalize it to the lower-case,
/// colon-separated form the controller keys stations by.
pub fn normalize_mac(field: &str, mac: &str) -> Result<String, CliError> {
    let normalized = mac.to_lowercase().replace('-', ":");
    let octets: Vec<&str> = normalized.split(':').collect();
    let valid = octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(normalized)
    } else {
        Err(CliError::Validation {
            field: field.into(),
            reason: format!("'{mac}' is not a MAC address (expected aa:bb:cc:dd:ee:ff)"),
        })
    }
}
