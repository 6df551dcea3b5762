//! Alarm command handler.

use chrono::{DateTime, Local};
use tabled::Tabled;

use imou_api::ImouClient;
use imou_api::models::Alarm;

use crate::error::CliError;
use crate::output::Printer;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlarmRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Channel")]
    channel: String,
}

impl From<&Alarm> for AlarmRow {
    fn from(a: &Alarm) -> Self {
        Self {
            id: a.alarm_id.clone(),
            time: format_time(a),
            kind: a.alarm_type.clone(),
            name: a.name.clone(),
            channel: a.channel_id.clone(),
        }
    }
}

/// Prefer the device's own local date; fall back to the epoch timestamp.
fn format_time(a: &Alarm) -> String {
    if !a.local_date.is_empty() {
        return a.local_date.clone();
    }
    DateTime::from_timestamp(a.time, 0).map_or_else(String::new, |dt| {
        dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &ImouClient, device: &str, out: &Printer) -> Result<(), CliError> {
    let messages = client.alarm_messages(device).await?;
    out.list(&messages.alarms, |a| AlarmRow::from(a), |a| a.alarm_id.clone())
}
