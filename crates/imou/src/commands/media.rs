//! Snapshot and live-stream command handlers.

use std::path::Path;

use serde::Serialize;
use tabled::Tabled;

use imou_api::ImouClient;
use imou_api::models::LiveStream;

use crate::cli::{LiveArgs, LiveCommand};
use crate::error::CliError;
use crate::output::Printer;

#[derive(Tabled)]
struct StreamRow {
    #[tabled(rename = "Stream")]
    stream_id: u32,
    #[tabled(rename = "HLS")]
    hls: String,
}

impl From<&LiveStream> for StreamRow {
    fn from(s: &LiveStream) -> Self {
        Self {
            stream_id: s.stream_id,
            hls: s.hls.clone(),
        }
    }
}

#[derive(Serialize)]
struct SnapshotReport {
    device: String,
    path: String,
    bytes: usize,
}

pub async fn snapshot(
    client: &ImouClient,
    device: &str,
    path: &Path,
    out: &Printer,
) -> Result<(), CliError> {
    let image = client.snapshot(device).await?;
    tokio::fs::write(path, &image).await?;

    let report = SnapshotReport {
        device: device.to_owned(),
        path: path.display().to_string(),
        bytes: image.len(),
    };
    out.item(
        &report,
        |r| format!("Saved {} bytes to {}", r.bytes, r.path),
        |r| r.path.clone(),
    )
}

pub async fn live(client: &ImouClient, args: LiveArgs, out: &Printer) -> Result<(), CliError> {
    let streams = match args.command {
        LiveCommand::Bind { device, quality } => {
            let bind = client.bind_live(&device, quality.into()).await?;
            if !bind.live_token.is_empty() {
                out.note(format_args!("Live token: {}", bind.live_token));
            }
            bind.streams
        }
        LiveCommand::Info { device } => client.live_stream_info(&device).await?.streams,
    };

    out.list(&streams, |s| StreamRow::from(s), |s| s.hls.clone())
}
