//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod account;
pub mod alarms;
pub mod config_cmd;
pub mod devices;
pub mod media;
pub mod settings;

use imou_api::ImouClient;

use crate::cli::Command;
use crate::error::CliError;
use crate::output::Printer;

/// Dispatch an account-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &ImouClient,
    out: &Printer,
) -> Result<(), CliError> {
    match cmd {
        Command::Login => account::login(client, out).await,
        Command::Devices(args) => devices::handle(client, args, out).await,
        Command::Alarms { device } => alarms::handle(client, &device, out).await,
        Command::Snapshot { device, out: path } => media::snapshot(client, &device, &path, out).await,
        Command::Live(args) => media::live(client, args, out).await,
        Command::NightVision { device } => settings::night_vision(client, &device, out).await,
        Command::Sdcard { device } => settings::sd_card(client, &device, out).await,
        Command::Callback(args) => settings::callback(client, args, out).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
