// ── Device storage ──
//
// The seam between discovery and whatever persists device records. The
// in-memory implementation is lock-free for readers and counts writes so
// callers can check the scan merge policy.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::model::DeviceRecord;

/// Keyed storage for device records.
pub trait DeviceStore {
    fn get(&self, id: &str) -> Option<DeviceRecord>;
    fn save(&self, record: DeviceRecord);
}

/// `DashMap`-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    devices: DashMap<String, DeviceRecord>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload records without counting them as writes.
    pub fn from_records(records: impl IntoIterator<Item = DeviceRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.devices.insert(record.id.clone(), record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Number of `save` calls since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// All records, sorted by name then id.
    pub fn snapshot(&self) -> Vec<DeviceRecord> {
        let mut records: Vec<DeviceRecord> =
            self.devices.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        records
    }
}

impl DeviceStore for MemoryStore {
    fn get(&self, id: &str) -> Option<DeviceRecord> {
        self.devices.get(id).map(|entry| entry.value().clone())
    }

    fn save(&self, record: DeviceRecord) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.devices.insert(record.id.clone(), record);
    }
}
