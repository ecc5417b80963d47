//! Client station command handlers.

use stamgr_api::{Controller, GuestAuthorization, Record};
use tabled::Tabled;

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "SSID")]
    essid: String,
    #[tabled(rename = "AP")]
    ap_mac: String,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "Authorized")]
    authorized: String,
}

impl From<&Record> for ClientRow {
    fn from(r: &Record) -> Self {
        // Controllers only carry `name` for aliased clients
        let name = match output::field(r, "name").as_str() {
            "-" => output::field(r, "hostname"),
            _ => output::field(r, "name"),
        };
        Self {
            mac: output::field(r, "mac"),
            name,
            ip: output::field(r, "ip"),
            essid: output::field(r, "essid"),
            ap_mac: output::field(r, "ap_mac"),
            guest: output::flag(r, "is_guest"),
            authorized: output::flag(r, "authorized"),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: ClientsArgs,
    global: &GlobalOpts,
    format: &OutputFormat,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List => {
            let clients = controller.get_clients().await?.unwrap_or_default();
            let out = output::render_list(format, &clients, |r| ClientRow::from(r), |r| {
                output::field(r, "mac")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Authorize {
            mac,
            minutes,
            up,
            down,
            bytes,
            ap_mac,
        } => {
            let mac = util::normalize_mac("mac", &mac)?;
            let ap_mac = ap_mac
                .map(|ap| util::normalize_mac("ap-mac", &ap))
                .transpose()?;

            let mut guest = GuestAuthorization::new(mac.as_str(), minutes);
            if let Some(kbps) = up {
                guest = guest.up_bandwidth(kbps);
            }
            if let Some(kbps) = down {
                guest = guest.down_bandwidth(kbps);
            }
            if let Some(mb) = bytes {
                guest = guest.byte_quota(mb);
            }
            if let Some(ap) = ap_mac {
                if !controller.api_version().supports_ap_mac() {
                    tracing::warn!(
                        version = %controller.api_version(),
                        "ap_mac is not supported by this controller version; ignoring"
                    );
                }
                guest = guest.ap_mac(ap);
            }

            let data = controller.authorize_guest(&guest).await?;
            util::report(
                &data,
                &format!("Guest {mac} authorized for {minutes} minutes"),
                global,
                format,
            );
            Ok(())
        }

        ClientsCommand::Unauthorize { mac } => {
            let mac = util::normalize_mac("mac", &mac)?;
            let data = controller.unauthorize_guest(&mac).await?;
            util::report(&data, &format!("Guest {mac} unauthorized"), global, format);
            Ok(())
        }

        ClientsCommand::Kick { mac } => {
            let mac = util::normalize_mac("mac", &mac)?;
            let data = controller.kick_sta(&mac).await?;
            util::report(&data, &format!("Client {mac} disconnected"), global, format);
            Ok(())
        }

        ClientsCommand::Block { mac } => {
            let mac = util::normalize_mac("mac", &mac)?;
            if !util::confirm(&format!("Block client {mac}?"), global.yes)? {
                return Ok(());
            }
            let data = controller.block_sta(&mac).await?;
            util::report(&data, &format!("Client {mac} blocked"), global, format);
            Ok(())
        }

        ClientsCommand::Unblock { mac } => {
            let mac = util::normalize_mac("mac", &mac)?;
            let data = controller.unblock_sta(&mac).await?;
            util::report(&data, &format!("Client {mac} unblocked"), global, format);
            Ok(())
        }
    }
}
