//! Local registry of submitted protocols, most recent first.
//!
//! Storage failures never reach the caller: reads degrade to an empty list
//! and failed writes are logged and dropped.

use std::sync::Arc;

use participa_core::ProtocolRecord;
use tracing::{info, warn};

use crate::PROTOCOLS_KEY;
use crate::kv::KeyValueStore;

#[derive(Clone)]
pub struct ProtocolRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl ProtocolRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All records, newest first. Missing, unreadable or corrupt storage yields an empty list.
    pub fn list(&self) -> Vec<ProtocolRecord> {
        let raw = match self.store.get(PROTOCOLS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read protocol list");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "protocol list is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Record a submission at the front of the list.
    pub fn save(&self, record: ProtocolRecord) {
        let protocol = record.protocol.clone();
        let mut records = self.list();
        records.insert(0, record);
        if self.write(&records) {
            info!(%protocol, total = records.len(), "protocol saved");
        }
    }

    /// Remove the first record with this protocol number. Returns whether one was found.
    pub fn delete(&self, protocol: &str) -> bool {
        let mut records = self.list();
        let Some(pos) = records.iter().position(|r| r.protocol == protocol) else {
            return false;
        };
        records.remove(pos);
        if !self.write(&records) {
            return false;
        }
        info!(%protocol, "protocol deleted");
        true
    }

    pub fn clear_all(&self) {
        match self.store.remove(PROTOCOLS_KEY) {
            Ok(()) => info!("protocol list cleared"),
            Err(e) => warn!(error = %e, "could not clear protocol list"),
        }
    }

    fn write(&self, records: &[ProtocolRecord]) -> bool {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not serialise protocol list");
                return false;
            }
        };
        match self.store.set(PROTOCOLS_KEY, &json) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not write protocol list");
                false
            }
        }
    }
}
