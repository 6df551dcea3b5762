// ── Device domain types ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Capability every camera is assumed to support.
pub const MOTION_DETECT: &str = "MotionDetect";
/// Vendor token for a white-light (spotlight) camera.
pub const WHITE_LIGHT: &str = "WLM";
/// Capability implied by [`WHITE_LIGHT`].
pub const LINKAGE_WHITE_LIGHT: &str = "Linkagewhitelight";
/// Configuration error reported for a device with no capabilities.
pub const NO_CAPABILITIES: &str = "ERROR.NO_CAPABILITIES";

/// Derive the capability set from the vendor's comma-separated `ability`
/// string.
///
/// Empty tokens are dropped, `MotionDetect` is always present, and
/// `Linkagewhitelight` is added when `WLM` is.
pub fn capabilities_from_ability(ability: &str) -> BTreeSet<String> {
    let mut caps: BTreeSet<String> = ability
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect();

    caps.insert(MOTION_DETECT.to_owned());
    if caps.contains(WHITE_LIGHT) {
        caps.insert(LINKAGE_WHITE_LIGHT.to_owned());
    }
    caps
}

/// One video channel of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub online: bool,
    pub picture_url: Option<String>,
    pub ability: String,
}

/// A camera (or NVR) bound to the account.
///
/// Every field except `image_identifier` is tracked: a scan that changes
/// any of them counts the device as updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: String,
    pub name: String,
    pub catalog: String,
    pub brand: String,
    pub model: String,
    pub capabilities: BTreeSet<String>,
    pub firmware_version: String,
    pub channel_count: u32,
    pub channels: Vec<Channel>,
    pub tls_enabled: bool,
    /// Icon name derived from the model, e.g. `IPC-C22EP.png`.
    pub image_identifier: String,
}

impl DeviceRecord {
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Problems that keep the device from being usable as configured.
    pub fn configuration_errors(&self) -> Vec<&'static str> {
        if self.capabilities.is_empty() {
            vec![NO_CAPABILITIES]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn capabilities_add_motion_detect() {
        assert_eq!(
            capabilities_from_ability("WLAN,MT"),
            caps(&["WLAN", "MT", "MotionDetect"])
        );
    }

    #[test]
    fn white_light_implies_linkage() {
        assert_eq!(
            capabilities_from_ability("WLAN,WLM"),
            caps(&["WLAN", "WLM", "MotionDetect", "Linkagewhitelight"])
        );
    }

    #[test]
    fn empty_ability_still_has_motion_detect() {
        assert_eq!(capabilities_from_ability(""), caps(&["MotionDetect"]));
        assert_eq!(capabilities_from_ability(",,"), caps(&["MotionDetect"]));
    }

    #[test]
    fn duplicate_tokens_collapse() {
        assert_eq!(
            capabilities_from_ability("MT,MT,MotionDetect"),
            caps(&["MT", "MotionDetect"])
        );
    }

    #[test]
    fn empty_capabilities_is_a_configuration_error() {
        let record = DeviceRecord::default();
        assert_eq!(record.configuration_errors(), vec![NO_CAPABILITIES]);

        let record = DeviceRecord {
            capabilities: capabilities_from_ability(""),
            ..DeviceRecord::default()
        };
        assert!(record.configuration_errors().is_empty());
    }

    #[test]
    fn channel_lookup_by_id() {
        let record = DeviceRecord {
            channels: vec![
                Channel {
                    id: "0".into(),
                    name: "Front".into(),
                    ..Channel::default()
                },
                Channel {
                    id: "1".into(),
                    name: "Back".into(),
                    ..Channel::default()
                },
            ],
            ..DeviceRecord::default()
        };
        assert_eq!(record.channel("1").map(|c| c.name.as_str()), Some("Back"));
        assert!(record.channel("7").is_none());
    }
}
