//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod clients;
pub mod config_cmd;
pub mod devices;
pub mod util;

use stamgr_api::Controller;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
    format: &OutputFormat,
) -> Result<(), CliError> {
    match cmd {
        Command::Clients(args) => clients::handle(controller, args, global, format).await,
        Command::Devices(args) => devices::handle(controller, args, global, format).await,
        // Config and Completions never open a session
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
