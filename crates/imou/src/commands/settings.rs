//! Night-vision, SD card, and callback command handlers.

use imou_api::ImouClient;
use imou_api::models::{CallbackConfig, NightVisionMode, StorageStatus};

use crate::cli::{CallbackArgs, CallbackCommand};
use crate::error::CliError;
use crate::output::Printer;

fn night_vision_detail(m: &NightVisionMode) -> String {
    let mut lines = vec![format!("Mode:      {}", m.mode)];
    if !m.modes.is_empty() {
        lines.push(format!("Supported: {}", m.modes.join(", ")));
    }
    lines.join("\n")
}

#[allow(clippy::cast_precision_loss)]
fn gib(bytes: u64) -> String {
    format!("{:.1} GiB", bytes as f64 / f64::from(1u32 << 30))
}

fn storage_detail(s: &StorageStatus) -> String {
    [
        format!("Total: {}", gib(s.total_bytes)),
        format!("Used:  {}", gib(s.used_bytes)),
        format!("Free:  {}", gib(s.free_bytes())),
    ]
    .join("\n")
}

fn callback_detail(c: &CallbackConfig) -> String {
    [
        format!(
            "URL:    {}",
            if c.callback_url.is_empty() { "-" } else { c.callback_url.as_str() }
        ),
        format!("Events: {}", c.callback_flag.as_deref().unwrap_or("-")),
        format!("Status: {}", c.status.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub async fn night_vision(client: &ImouClient, device: &str, out: &Printer) -> Result<(), CliError> {
    let mode = client.night_vision_mode(device).await?;
    out.item(&mode, night_vision_detail, |m| m.mode.clone())
}

pub async fn sd_card(client: &ImouClient, device: &str, out: &Printer) -> Result<(), CliError> {
    let storage = client.sd_card_status(device).await?;
    out.item(&storage, storage_detail, |s| s.free_bytes().to_string())
}

pub async fn callback(client: &ImouClient, args: CallbackArgs, out: &Printer) -> Result<(), CliError> {
    match args.command {
        CallbackCommand::Get { device } => {
            let config = client.message_callback(&device).await?;
            out.item(&config, callback_detail, |c| c.callback_url.clone())?;
        }
        CallbackCommand::Set { url } => {
            let url = url.unwrap_or_default();
            client.set_message_callback(&url).await?;
            if url.is_empty() {
                out.note("Push callback switched off");
            } else {
                out.note(format_args!("Push callback set to {url}"));
            }
        }
    }
    Ok(())
}
