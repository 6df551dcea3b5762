// Imou open API payload types
//
// Models for the `data` block of each operation. Fields default liberally
// because the vendor omits keys depending on device family and firmware.
// Identifiers that arrive as either strings or numbers are normalized to
// strings.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    use serde::de::Error as _;
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom(format!("expected unsigned integer, got {n}"))),
        Value::String(s) if s.is_empty() => Ok(0),
        Value::String(s) => s.parse().map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected integer, got {other}"))),
    }
}

// ── Authentication ───────────────────────────────────────────────────

/// `accessToken` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenInfo {
    pub access_token: String,
    /// Seconds until expiry as reported by the vendor. Informational only.
    pub expire_time: Option<i64>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// `deviceList` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceList {
    pub count: u32,
    pub devices: Vec<DeviceInfo>,
}

/// One device as listed by `deviceList`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub device_id: String,
    pub name: String,
    pub device_catalog: String,
    pub brand: String,
    pub device_model: String,
    /// Comma-separated capability tokens, e.g. `"WLAN,MT,HSEncrypt,WLM"`.
    pub ability: String,
    /// Firmware version.
    pub version: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub channel_num: u32,
    pub tls_enable: bool,
    pub status: Option<String>,
    pub channels: Vec<ChannelInfo>,
}

/// Per-channel metadata nested in [`DeviceInfo`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub channel_id: String,
    pub channel_name: String,
    pub channel_online: bool,
    pub channel_pic_url: Option<String>,
    pub ability: String,
}

/// `deviceOnline` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OnlineStatus {
    #[serde(deserialize_with = "lenient_string")]
    pub device_id: String,
    /// `"1"` online, `"0"` offline, `"3"` upgrading, `"4"` sleeping.
    #[serde(deserialize_with = "lenient_string")]
    pub on_line: String,
    pub channels: Vec<ChannelOnlineStatus>,
}

impl OnlineStatus {
    pub fn is_online(&self) -> bool {
        self.on_line == "1"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelOnlineStatus {
    #[serde(deserialize_with = "lenient_string")]
    pub channel_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub on_line: String,
}

// ── Alarms ───────────────────────────────────────────────────────────

/// `getAlarmMessage` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlarmMessages {
    pub count: u32,
    #[serde(deserialize_with = "lenient_string")]
    pub next_alarm_id: String,
    pub alarms: Vec<Alarm>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Alarm {
    #[serde(deserialize_with = "lenient_string")]
    pub alarm_id: String,
    pub name: String,
    /// Unix timestamp in seconds.
    pub time: i64,
    pub local_date: String,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub alarm_type: String,
    pub thumb_url: Option<String>,
    pub device_id: String,
    #[serde(rename = "picurlArray")]
    pub pic_urls: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub channel_id: String,
    pub token: Option<String>,
}

// ── Device settings ──────────────────────────────────────────────────

/// `getNightVisionMode` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NightVisionMode {
    pub mode: String,
    pub modes: Vec<String>,
}

/// `getMessageCallback` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallbackConfig {
    pub callback_url: String,
    pub callback_flag: Option<String>,
    pub status: Option<String>,
}

// ── Storage ──────────────────────────────────────────────────────────

/// `deviceSdcardStatus` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdCardState {
    /// `"normal"`, `"abnormal"`, `"recovering"`, `"empty"`, ...
    pub status: String,
}

/// `deviceStorage` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageStatus {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

impl StorageStatus {
    pub fn free_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.used_bytes)
    }
}

// ── Media ────────────────────────────────────────────────────────────

/// Live stream quality. Sent as the ordinal `streamId`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamProfile {
    #[default]
    Hd,
    Sd,
}

impl StreamProfile {
    pub fn stream_id(self) -> u8 {
        match self {
            Self::Hd => 0,
            Self::Sd => 1,
        }
    }
}

/// `setDeviceSnapEnhanced` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapEnhanced {
    /// Short-lived download URL. The image is generated asynchronously, so
    /// it may 404 for a moment after the call returns.
    pub url: String,
}

/// `bindDeviceLive` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LiveBind {
    pub live_token: String,
    #[serde(deserialize_with = "lenient_string")]
    pub live_status: String,
    pub streams: Vec<LiveStream>,
}

/// `getLiveStreamInfo` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveStreams {
    pub streams: Vec<LiveStream>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LiveStream {
    pub hls: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub stream_id: u32,
    pub cover_url: Option<String>,
    pub live_token: Option<String>,
}

/// Payload of operations that return nothing useful.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}
