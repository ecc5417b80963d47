//! Device command handlers.

use stamgr_api::{Controller, Record};
use tabled::Tabled;

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "State")]
    state: String,
}

/// Controller device state codes as reported by `stat/device`.
fn state_label(r: &Record) -> String {
    match r.get("state").and_then(serde_json::Value::as_i64) {
        Some(0) => "offline".into(),
        Some(1) => "connected".into(),
        Some(2) => "pending".into(),
        Some(4) => "upgrading".into(),
        Some(5) => "provisioning".into(),
        Some(6) => "heartbeat missed".into(),
        Some(other) => other.to_string(),
        None => "-".into(),
    }
}

impl From<&Record> for DeviceRow {
    fn from(r: &Record) -> Self {
        Self {
            mac: output::field(r, "mac"),
            name: output::field(r, "name"),
            model: output::field(r, "model"),
            kind: output::field(r, "type"),
            ip: output::field(r, "ip"),
            version: output::field(r, "version"),
            state: state_label(r),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: DevicesArgs,
    global: &GlobalOpts,
    format: &OutputFormat,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = controller.get_aps().await?.unwrap_or_default();
            let out = output::render_list(format, &devices, |r| DeviceRow::from(r), |r| {
                output::field(r, "mac")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
