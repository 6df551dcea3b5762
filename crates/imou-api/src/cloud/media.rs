// Cloud media endpoints
//
// Snapshots and live-stream bindings. Stream protocols are out of scope;
// these calls only produce URLs (and, for snapshots, the image bytes).

use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::cloud::client::{DEFAULT_CHANNEL, ImouClient};
use crate::error::Error;
use crate::models::{LiveBind, LiveStreams, SnapEnhanced, StreamProfile};
use crate::sign::params;

/// Delay between requesting a snapshot and downloading it. The vendor
/// acknowledges the request before the image exists.
pub const SNAPSHOT_DELAY: Duration = Duration::from_millis(1500);

impl ImouClient {
    /// Capture a fresh snapshot and return the image bytes.
    ///
    /// Calls `setDeviceSnapEnhanced`, waits [`SNAPSHOT_DELAY`], then
    /// downloads the returned URL. Dropping the future during the wait
    /// cancels it.
    pub async fn snapshot(&self, device_id: &str) -> Result<Vec<u8>, Error> {
        let snap: SnapEnhanced = self.channel_call("setDeviceSnapEnhanced", device_id).await?;
        debug!(device_id, url = %snap.url, "snapshot requested, waiting for image");

        tokio::time::sleep(SNAPSHOT_DELAY).await;
        self.download(&snap.url).await
    }

    /// Plain GET of an arbitrary URL, returning the body bytes.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, Error> {
        let target = Url::parse(url)?;
        debug!("GET {}", target);

        let resp = self.http().get(target).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(Error::Transport)?;
        Ok(bytes.to_vec())
    }

    /// Create a live-stream binding for the device's default channel.
    ///
    /// `bindDeviceLive {deviceId, channelId: "0", streamId}`
    pub async fn bind_live(&self, device_id: &str, profile: StreamProfile) -> Result<LiveBind, Error> {
        debug!(device_id, ?profile, "binding live stream");
        self.call_authed(
            "bindDeviceLive",
            params([
                ("deviceId", Value::from(device_id)),
                ("channelId", Value::from(DEFAULT_CHANNEL)),
                ("streamId", Value::from(profile.stream_id())),
            ]),
        )
        .await
    }

    /// Existing live-stream URLs for the device's default channel.
    pub async fn live_stream_info(&self, device_id: &str) -> Result<LiveStreams, Error> {
        debug!(device_id, "fetching live stream info");
        self.channel_call("getLiveStreamInfo", device_id).await
    }
}
