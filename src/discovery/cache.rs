use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::backend::TruckSource;
use crate::context::AppContext;

use super::query::fetch_trucks;
use super::{DiscoveryResult, SearchQuery};

struct Slot {
    /// Generation of the most recent refresh issued for this slot
    latest: u64,
    result: DiscoveryResult,
}

/// In-memory holder of the latest discovery result per slot.
///
/// Every refresh takes a generation from a cache-wide counter. A completion
/// is applied only while its generation is still the slot's latest, so when
/// refreshes overlap the last one issued wins regardless of which backend
/// call finishes first.
pub struct DiscoveryCache {
    source: Arc<dyn TruckSource>,
    slots: RwLock<HashMap<String, Slot>>,
    next_generation: AtomicU64,
}

impl DiscoveryCache {
    pub fn new(source: Arc<dyn TruckSource>) -> Self {
        Self {
            source,
            slots: RwLock::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Snapshot of a slot; `Idle` if it was never refreshed.
    pub async fn current(&self, slot: &str) -> DiscoveryResult {
        self.slots
            .read()
            .await
            .get(slot)
            .map(|s| s.result.clone())
            .unwrap_or_else(DiscoveryResult::idle)
    }

    /// Put the slot into `Loading` for `query`, fetch, and store the outcome
    /// unless a newer refresh was issued meanwhile. Returns the slot snapshot
    /// after completion.
    pub async fn refresh(&self, slot: &str, query: SearchQuery) -> DiscoveryResult {
        let generation = self.begin(slot, query).await;
        let outcome = fetch_trucks(self.source.as_ref(), &query).await;
        if let Err(e) = &outcome {
            error!(
                slot,
                generation,
                backend = self.source.name(),
                error = %e,
                "Error fetching nearby food trucks"
            );
        }
        self.complete(slot, generation, DiscoveryResult::completed(query, outcome))
            .await
    }

    /// Reset every slot to `Idle`. Refreshes still in flight are discarded.
    pub async fn clear(&self) {
        let mut slots = self.slots.write().await;
        for slot in slots.values_mut() {
            slot.latest = self.next_generation.fetch_add(1, Ordering::SeqCst);
            slot.result = DiscoveryResult::idle();
        }
        info!(slots = slots.len(), "Discovery cache cleared");
    }

    async fn begin(&self, slot: &str, query: SearchQuery) -> u64 {
        // Issued under the lock so a slot's generation only ever increases.
        let mut slots = self.slots.write().await;
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        slots.insert(
            slot.to_string(),
            Slot {
                latest: generation,
                result: DiscoveryResult::loading(query),
            },
        );
        debug!(slot, generation, "Discovery refresh started");
        generation
    }

    async fn complete(&self, slot: &str, generation: u64, result: DiscoveryResult) -> DiscoveryResult {
        let mut slots = self.slots.write().await;
        // Slots are created by `begin` and never removed; `clear` only resets them.
        let Some(entry) = slots.get_mut(slot) else {
            debug_assert!(false, "discovery slot {} vanished while in flight", slot);
            return DiscoveryResult::idle();
        };

        if entry.latest != generation {
            debug!(
                slot,
                generation,
                latest = entry.latest,
                "Discarding superseded discovery result"
            );
            return entry.result.clone();
        }

        debug!(
            slot,
            generation,
            status = result.status.label(),
            count = result.trucks.len(),
            "Discovery refresh completed"
        );
        entry.result = result;
        entry.result.clone()
    }
}

/// Clear the cache whenever the signed-in user changes.
pub fn spawn_session_watcher(context: Arc<AppContext>, cache: Arc<DiscoveryCache>) -> JoinHandle<()> {
    let mut rx = context.subscribe_session();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let signed_in = rx.borrow_and_update().is_some();
            info!(signed_in, "Session changed, clearing discovery results");
            cache.clear().await;
        }
    })
}
