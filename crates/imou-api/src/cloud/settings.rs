// Cloud device settings endpoints
//
// Night-vision mode and the account's alarm/status push callback.

use serde_json::Value;
use tracing::debug;

use crate::cloud::client::ImouClient;
use crate::error::Error;
use crate::models::{CallbackConfig, Empty, NightVisionMode};
use crate::sign::params;

/// Events pushed to the callback URL.
pub const CALLBACK_FLAGS: &str = "alarm,deviceStatus";

impl ImouClient {
    /// Current and supported night-vision modes.
    ///
    /// `getNightVisionMode {deviceId, channelId: "0"}`
    pub async fn night_vision_mode(&self, device_id: &str) -> Result<NightVisionMode, Error> {
        self.channel_call("getNightVisionMode", device_id).await
    }

    /// The push callback registered for the account.
    pub async fn message_callback(&self, device_id: &str) -> Result<CallbackConfig, Error> {
        self.device_call("getMessageCallback", device_id).await
    }

    /// Register (or, with an empty URL, disable) the push callback.
    pub async fn set_message_callback(&self, url: &str) -> Result<(), Error> {
        let status = if url.is_empty() { "off" } else { "on" };
        debug!(url, status, "updating message callback");

        let _: Empty = self
            .call_authed(
                "setMessageCallback",
                params([
                    ("callbackUrl", Value::from(url)),
                    ("callbackFlag", Value::from(CALLBACK_FLAGS)),
                    ("status", Value::from(status)),
                ]),
            )
            .await?;
        Ok(())
    }
}
