//! Raw event payloads, keyed by event id.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// A submitted raw-text event. The raw text never leaves this store except
/// into the pipeline; metadata is opaque caller context (source, channel)
/// and must not carry PII.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEvent {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub raw_text: String,
    pub metadata: BTreeMap<String, String>,
    pub received_at: DateTime<Utc>,
}

pub struct EventStore {
    entries: DashMap<Uuid, (StoredEvent, Instant)>,
    ttl: Duration,
}

impl EventStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Store raw text under a fresh event id.
    pub fn put(&self, raw_text: String) -> Uuid {
        self.put_with_metadata(raw_text, BTreeMap::new())
    }

    pub fn put_with_metadata(
        &self,
        raw_text: String,
        metadata: BTreeMap<String, String>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let event = StoredEvent {
            id,
            raw_text,
            metadata,
            received_at: Utc::now(),
        };
        self.entries.insert(id, (event, Instant::now() + self.ttl));
        debug!(event_id = %id, "event stored");
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<StoredEvent> {
        self.entries.get(id).and_then(|entry| {
            let (event, deadline) = entry.value();
            if Instant::now() < *deadline {
                Some(event.clone())
            } else {
                None
            }
        })
    }

    pub fn get_raw_text(&self, id: &Uuid) -> Option<String> {
        self.get(id).map(|event| event.raw_text)
    }

    pub fn remove(&self, id: &Uuid) {
        self.entries.remove(id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired entries. Returns the number removed.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (_, deadline)| now < *deadline);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let store = EventStore::new(Duration::from_secs(60));
        let id = store.put("hemlig text".into());
        assert_eq!(store.get_raw_text(&id).as_deref(), Some("hemlig text"));
        assert!(store.get_raw_text(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_expired_entries_evicted() {
        let store = EventStore::new(Duration::ZERO);
        let id = store.put("snart borta".into());
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.get_raw_text(&id).is_none());
        assert_eq!(store.evict_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_metadata_round_trip() {
        let store = EventStore::new(Duration::from_secs(60));
        let metadata = BTreeMap::from([("source".to_string(), "inbox".to_string())]);
        let id = store.put_with_metadata("text".into(), metadata);
        let event = store.get(&id).unwrap();
        assert_eq!(event.metadata["source"], "inbox");
        // raw text never serializes
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("raw_text").is_none());
        assert!(json["metadata"].is_object());
    }

    #[test]
    fn test_remove() {
        let store = EventStore::new(Duration::from_secs(60));
        let id = store.put("x".into());
        store.remove(&id);
        assert!(store.get_raw_text(&id).is_none());
    }
}
