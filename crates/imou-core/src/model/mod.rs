// ── Domain model ──
//
// Canonical representation of an Imou device as consumers (the CLI, a
// device store) see it. Built from `imou_api::models::DeviceInfo` by
// `crate::convert`.

pub mod device;

pub use device::{
    Channel, DeviceRecord, LINKAGE_WHITE_LIGHT, MOTION_DETECT, NO_CAPABILITIES, WHITE_LIGHT,
    capabilities_from_ability,
};
