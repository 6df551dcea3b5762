// Cloud device endpoints
//
// Device listing (`deviceList`, paged by `queryRange`), online status,
// restart, and camera feature toggles.

use serde_json::Value;
use tracing::debug;

use crate::cloud::client::{AccountStatus, ImouClient};
use crate::error::Error;
use crate::models::{DeviceInfo, DeviceList, Empty, OnlineStatus};
use crate::sign::params;

/// Devices returned per `deviceList` page.
pub const DEVICE_PAGE_SIZE: u32 = 100;

/// `queryRange` for a 1-indexed page: page 1 is `"1-100"`, page 2 is
/// `"101-200"`, and so on. Page 0 is treated as page 1.
pub fn query_range(page: u32) -> String {
    let start = page.saturating_sub(1) * DEVICE_PAGE_SIZE + 1;
    format!("{start}-{}", start + DEVICE_PAGE_SIZE - 1)
}

impl ImouClient {
    /// Fetch one page of the account's devices.
    ///
    /// The device list is the first call a scan makes, so it doubles as a
    /// health check: success publishes `Online`, failure publishes `Error`.
    pub async fn list_devices(&self, page: u32) -> Result<Vec<DeviceInfo>, Error> {
        let range = query_range(page);
        debug!(page, %range, "listing devices");

        let result: Result<DeviceList, Error> = self
            .call_authed("deviceList", params([("queryRange", Value::from(range))]))
            .await;

        match result {
            Ok(list) => {
                self.set_status(AccountStatus::Online);
                Ok(list.devices)
            }
            Err(e) => {
                if !matches!(e, Error::NotReady) {
                    self.set_status(AccountStatus::Error {
                        code: e.api_error_code().map(str::to_owned),
                        message: e.to_string(),
                    });
                }
                Err(e)
            }
        }
    }

    /// Online state of a device and its channels.
    ///
    /// `deviceOnline {deviceId}`
    pub async fn device_status(&self, device_id: &str) -> Result<OnlineStatus, Error> {
        debug!(device_id, "querying device status");
        self.device_call("deviceOnline", device_id).await
    }

    /// Reboot a device.
    ///
    /// `restartDevice {deviceId}`
    pub async fn restart_device(&self, device_id: &str) -> Result<(), Error> {
        debug!(device_id, "restarting device");
        let _: Empty = self.device_call("restartDevice", device_id).await?;
        Ok(())
    }

    /// Switch a camera feature on or off.
    ///
    /// `enable_type` is the vendor's feature name (`"closeCamera"`,
    /// `"motionDetect"`, `"whiteLight"`, ...).
    pub async fn set_camera_status(
        &self,
        device_id: &str,
        enable_type: &str,
        enable: bool,
    ) -> Result<(), Error> {
        debug!(device_id, enable_type, enable, "setting camera status");
        let _: Empty = self
            .call_authed(
                "setDeviceCameraStatus",
                params([
                    ("deviceId", Value::from(device_id)),
                    ("enableType", Value::from(enable_type)),
                    ("enable", Value::Bool(enable)),
                ]),
            )
            .await?;
        Ok(())
    }
}
