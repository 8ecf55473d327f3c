//! Ephemeral token↔value mappings (900 s default TTL).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// token -> original value, per event. The shortest-lived store in the
/// system: once it expires, de-anonymization is impossible.
pub struct MappingStore {
    entries: DashMap<Uuid, (HashMap<String, String>, Instant)>,
    ttl: Duration,
}

impl MappingStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn put(&self, event_id: Uuid, mapping: HashMap<String, String>) {
        debug!(event_id = %event_id, tokens = mapping.len(), "mapping stored");
        self.entries
            .insert(event_id, (mapping, Instant::now() + self.ttl));
    }

    pub fn get(&self, event_id: &Uuid) -> Option<HashMap<String, String>> {
        self.entries.get(event_id).and_then(|entry| {
            let (mapping, deadline) = entry.value();
            if Instant::now() < *deadline {
                Some(mapping.clone())
            } else {
                None
            }
        })
    }

    pub fn remove(&self, event_id: &Uuid) {
        self.entries.remove(event_id);
    }

    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (_, deadline)| now < *deadline);
        before - self.entries.len()
    }
}
