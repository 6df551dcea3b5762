// Cloud storage endpoints

use tracing::{debug, warn};

use crate::cloud::client::ImouClient;
use crate::error::Error;
use crate::models::{SdCardState, StorageStatus};

/// The only SD-card status that allows a capacity query.
pub const SD_CARD_NORMAL: &str = "normal";

impl ImouClient {
    /// SD-card capacity, but only for a card reporting `normal`.
    ///
    /// Queries `deviceSdcardStatus` first. Any other status fails with
    /// [`Error::SdCard`] carrying the literal value, and `deviceStorage` is
    /// never called.
    pub async fn sd_card_status(&self, device_id: &str) -> Result<StorageStatus, Error> {
        let state: SdCardState = self.device_call("deviceSdcardStatus", device_id).await?;

        if state.status != SD_CARD_NORMAL {
            warn!(device_id, status = %state.status, "sd card not usable");
            return Err(Error::SdCard {
                status: state.status,
            });
        }

        debug!(device_id, "sd card normal, querying storage");
        self.device_call("deviceStorage", device_id).await
    }
}
