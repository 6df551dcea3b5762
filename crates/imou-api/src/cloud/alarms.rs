// Cloud alarm endpoints

use chrono::{DateTime, Days, Local, TimeZone};
use serde_json::Value;
use tracing::debug;

use crate::cloud::client::{DEFAULT_CHANNEL, ImouClient};
use crate::error::Error;
use crate::models::AlarmMessages;
use crate::sign::params;

/// Alarms returned per request.
pub const ALARM_COUNT: u32 = 10;

const ALARM_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `(beginTime, endTime)` for the alarm query: 30 days back through
/// tomorrow, in the timezone of `now`.
pub fn alarm_window<Tz: TimeZone>(now: &DateTime<Tz>) -> (String, String)
where
    Tz::Offset: std::fmt::Display,
{
    let begin = now.clone() - Days::new(30);
    let end = now.clone() + Days::new(1);
    (
        begin.format(ALARM_TIME_FORMAT).to_string(),
        end.format(ALARM_TIME_FORMAT).to_string(),
    )
}

impl ImouClient {
    /// Most recent alarms for a device's default channel.
    ///
    /// The window is fixed to the last 30 days through tomorrow, rendered in
    /// the process's local time.
    pub async fn alarm_messages(&self, device_id: &str) -> Result<AlarmMessages, Error> {
        let (begin, end) = alarm_window(&Local::now());
        debug!(device_id, %begin, %end, "fetching alarm messages");

        self.call_authed(
            "getAlarmMessage",
            params([
                ("deviceId", Value::from(device_id)),
                ("count", Value::from(ALARM_COUNT.to_string())),
                ("channelId", Value::from(DEFAULT_CHANNEL)),
                ("beginTime", Value::from(begin)),
                ("endTime", Value::from(end)),
            ]),
        )
        .await
    }
}
