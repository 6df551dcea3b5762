// ── API-to-domain conversions ──
//
// Bridges `imou_api` wire models into `imou_core::model` types and merges a
// fresh listing into a stored record.

use imou_api::models::{ChannelInfo, DeviceInfo};

use crate::model::{Channel, DeviceRecord, capabilities_from_ability};

impl From<&ChannelInfo> for Channel {
    fn from(c: &ChannelInfo) -> Self {
        Self {
            id: c.channel_id.clone(),
            name: c.channel_name.clone(),
            online: c.channel_online,
            picture_url: c.channel_pic_url.clone(),
            ability: c.ability.clone(),
        }
    }
}

impl From<&DeviceInfo> for DeviceRecord {
    fn from(d: &DeviceInfo) -> Self {
        let mut record = Self::default();
        record.merge_from(d);
        record
    }
}

impl DeviceRecord {
    /// Overwrite every tracked field from a listing entry.
    ///
    /// Returns `true` if anything changed, which is what decides whether a
    /// scan saves the record.
    pub fn merge_from(&mut self, d: &DeviceInfo) -> bool {
        let merged = Self {
            id: d.device_id.clone(),
            name: d.name.clone(),
            catalog: d.device_catalog.clone(),
            brand: d.brand.clone(),
            model: d.device_model.clone(),
            capabilities: capabilities_from_ability(&d.ability),
            firmware_version: d.version.clone(),
            channel_count: d.channel_num,
            channels: d.channels.iter().map(Channel::from).collect(),
            tls_enabled: d.tls_enable,
            image_identifier: format!("{}.png", d.device_model),
        };

        if *self == merged {
            return false;
        }
        *self = merged;
        true
    }
}
