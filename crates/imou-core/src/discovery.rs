// ── Device discovery ──
//
// Walks the paged `deviceList` operation and feeds each device to a
// consumer in server order. `scan` layers the store merge policy on top:
// unknown ids are created, known ids are merged and only written when a
// tracked field changed.

use std::future::Future;

use imou_api::models::DeviceInfo;
use imou_api::{DEVICE_PAGE_SIZE, ImouClient};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::DeviceRecord;
use crate::store::DeviceStore;

/// Anything that can produce one page of the device listing.
pub trait DevicePageSource {
    /// Fetch the 1-indexed `page`.
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<Vec<DeviceInfo>, imou_api::Error>> + Send;
}

impl DevicePageSource for ImouClient {
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<Vec<DeviceInfo>, imou_api::Error>> + Send {
        self.list_devices(page)
    }
}

/// Counters for one full scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryResult {
    pub new_count: usize,
    pub updated_count: usize,
    pub existing_count: usize,
}

impl DiscoveryResult {
    pub fn total(&self) -> usize {
        self.new_count + self.updated_count + self.existing_count
    }
}

/// Fetch pages until one comes back short, invoking `consumer` once per
/// device. Returns the number of devices handled.
///
/// A failed page aborts the walk; devices from earlier pages have already
/// been handed to the consumer.
pub async fn paginate<S, F>(source: &S, mut consumer: F) -> Result<usize, CoreError>
where
    S: DevicePageSource + ?Sized,
    F: FnMut(DeviceInfo),
{
    let mut page: u32 = 0;
    let mut handled = 0;

    loop {
        page += 1;
        let devices = source.fetch_page(page).await?;
        let fetched = devices.len();
        debug!(page, fetched, "device page received");

        for device in devices {
            consumer(device);
        }
        handled += fetched;

        if fetched != DEVICE_PAGE_SIZE as usize {
            break;
        }
    }

    Ok(handled)
}

/// Every device on the account, in server order.
pub async fn collect_devices<S>(source: &S) -> Result<Vec<DeviceInfo>, CoreError>
where
    S: DevicePageSource + ?Sized,
{
    let mut devices = Vec::new();
    paginate(source, |d| devices.push(d)).await?;
    Ok(devices)
}

/// Full scan: merge every listed device into `store`.
pub async fn scan<S, D>(source: &S, store: &D) -> Result<DiscoveryResult, CoreError>
where
    S: DevicePageSource + ?Sized,
    D: DeviceStore + ?Sized,
{
    let mut result = DiscoveryResult::default();

    paginate(source, |device| match store.get(&device.device_id) {
        None => {
            debug!(device_id = %device.device_id, "new device");
            store.save(DeviceRecord::from(&device));
            result.new_count += 1;
        }
        Some(mut record) => {
            if record.merge_from(&device) {
                debug!(device_id = %device.device_id, "device updated");
                store.save(record);
                result.updated_count += 1;
            } else {
                result.existing_count += 1;
            }
        }
    })
    .await?;

    info!(
        new = result.new_count,
        updated = result.updated_count,
        existing = result.existing_count,
        "device scan complete"
    );
    Ok(result)
}
