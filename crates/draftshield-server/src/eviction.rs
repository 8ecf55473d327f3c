//! Background TTL sweep over all RAM-only stores.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub fn start_eviction_worker(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = state.events.evict_expired()
                + state.mappings.evict_expired()
                + state.verdicts.evict_expired()
                + state.approvals.evict_expired();
            if evicted > 0 {
                debug!(evicted, "expired entries swept");
            }
        }
    });
}
