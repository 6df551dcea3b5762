//! Device command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use imou_api::ImouClient;
use imou_api::models::OnlineStatus;
use imou_core::{DeviceRecord, DiscoveryResult, MemoryStore, collect_devices, scan};

use crate::cli::{DevicesArgs, DevicesCommand};
use crate::config;
use crate::error::CliError;
use crate::output::Printer;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Type")]
    catalog: String,
    #[tabled(rename = "Channels")]
    channels: u32,
    #[tabled(rename = "Firmware")]
    firmware: String,
}

impl From<&DeviceRecord> for DeviceRow {
    fn from(d: &DeviceRecord) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            model: d.model.clone(),
            catalog: d.catalog.clone(),
            channels: d.channel_count,
            firmware: d.firmware_version.clone(),
        }
    }
}

fn status_detail(s: &OnlineStatus, out: &Printer) -> String {
    let mut lines = vec![
        format!("Device:   {}", s.device_id),
        format!("State:    {}", out.online(s.is_online())),
    ];
    for ch in &s.channels {
        lines.push(format!("Channel {}: {}", ch.channel_id, out.online(ch.on_line == "1")));
    }
    lines.join("\n")
}

fn scan_detail(r: &DiscoveryResult) -> String {
    [
        format!("New:      {}", r.new_count),
        format!("Updated:  {}", r.updated_count),
        format!("Existing: {}", r.existing_count),
    ]
    .join("\n")
}

// ── Device cache ────────────────────────────────────────────────────

fn load_cache(path: &Path) -> Result<MemoryStore, CliError> {
    if !path.exists() {
        return Ok(MemoryStore::new());
    }
    let raw = std::fs::read_to_string(path)?;
    let records: Vec<DeviceRecord> = serde_json::from_str(&raw)?;
    Ok(MemoryStore::from_records(records))
}

fn save_cache(path: &Path, store: &MemoryStore) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&store.snapshot())?)?;
    Ok(())
}

fn spinner(message: &'static str, quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[derive(Serialize)]
struct ToggleReport<'a> {
    device: &'a str,
    feature: &'a str,
    enabled: bool,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ImouClient,
    args: DevicesArgs,
    out: &Printer,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List { page } => {
            let devices = match page {
                Some(page) => client.list_devices(page).await?,
                None => collect_devices(client).await?,
            };
            let records: Vec<DeviceRecord> = devices.iter().map(DeviceRecord::from).collect();
            out.list(&records, |d| DeviceRow::from(d), |d| d.id.clone())
        }

        DevicesCommand::Scan { cache } => {
            let path = cache.unwrap_or_else(config::device_cache_path);
            let store = load_cache(&path)?;

            let pb = spinner("Scanning devices...", out.is_quiet());
            let result = scan(client, &store).await;
            pb.finish_and_clear();
            let result = result?;

            if store.write_count() > 0 {
                save_cache(&path, &store)?;
            }
            for record in store.snapshot() {
                for problem in record.configuration_errors() {
                    tracing::warn!(device_id = %record.id, problem, "device needs attention");
                }
            }

            out.item(&result, scan_detail, |r| r.total().to_string())
        }

        DevicesCommand::Status { device } => {
            let status = client.device_status(&device).await?;
            out.item(&status, |s| status_detail(s, out), |s| s.on_line.clone())
        }

        DevicesCommand::Restart { device } => {
            client.restart_device(&device).await?;
            out.note(format_args!("Restart requested for {device}"));
            Ok(())
        }

        DevicesCommand::Enable { device, feature } => {
            toggle(client, &device, &feature, true, out).await
        }

        DevicesCommand::Disable { device, feature } => {
            toggle(client, &device, &feature, false, out).await
        }
    }
}

async fn toggle(
    client: &ImouClient,
    device: &str,
    feature: &str,
    enabled: bool,
    out: &Printer,
) -> Result<(), CliError> {
    client.set_camera_status(device, feature, enabled).await?;

    let report = ToggleReport {
        device,
        feature,
        enabled,
    };
    out.item(
        &report,
        |r| {
            let state = if r.enabled { "enabled" } else { "disabled" };
            format!("{} {state} on {}", r.feature, r.device)
        },
        |r| r.enabled.to_string(),
    )
}
