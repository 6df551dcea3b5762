// imou-core: Domain model and device discovery between imou-api and consumers.

pub mod convert;
pub mod discovery;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use discovery::{DevicePageSource, DiscoveryResult, collect_devices, paginate, scan};
pub use error::CoreError;
pub use model::{Channel, DeviceRecord};
pub use store::{DeviceStore, MemoryStore};
