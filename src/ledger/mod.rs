//! Bounded in-memory ledger of processed delivery IDs.
//!
//! The sender delivers at-least-once: the same delivery ID may arrive again
//! after a network retry. The ledger turns that into at-most-once side
//! effects by recording every ID it lets through and short-circuiting
//! repeats.
//!
//! The ledger is process-lifetime only. A restart empties it, so a
//! redelivery shortly after a restart is reprocessed; deployments that need
//! stronger guarantees put a durable store behind this seam.
//!
//! # Eviction
//!
//! Capacity is bounded (default 1000 entries). On overflow, the
//! oldest-inserted entries are evicted first, down to capacity minus one
//! eviction batch (a tenth of capacity). Insertion order is tracked
//! explicitly in a queue so eviction is deterministic FIFO, never an
//! arbitrary subset of a hash set.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use crate::types::DeliveryId;

/// Default maximum number of delivery IDs retained.
pub const DEFAULT_LEDGER_CAPACITY: usize = 1000;

/// Concurrency-safe record of delivery IDs already processed.
///
/// One instance is owned by the server state and shared across request
/// tasks. All mutation happens inside [`DeliveryLedger::check_and_record`]
/// under a single lock acquisition.
#[derive(Debug)]
pub struct DeliveryLedger {
    capacity: usize,
    inner: Mutex<LedgerInner>,
}

/// Membership set plus insertion order. The two structures always describe
/// the same ID set.
#[derive(Debug, Default)]
struct LedgerInner {
    order: VecDeque<DeliveryId>,
    seen: HashSet<DeliveryId>,
}

impl DeliveryLedger {
    /// Creates an empty ledger bounded to `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Configuration validates this before
    /// construction.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ledger capacity must be greater than zero");
        DeliveryLedger {
            capacity,
            inner: Mutex::new(LedgerInner::default()),
        }
    }

    /// Creates an empty ledger with [`DEFAULT_LEDGER_CAPACITY`].
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_LEDGER_CAPACITY)
    }

    /// Atomically checks whether `id` has been seen and records it if not.
    ///
    /// Returns `true` on first sighting (caller proceeds to dispatch) and
    /// `false` for a duplicate (caller acknowledges without dispatching).
    /// Check and record are one operation under one lock: two concurrent
    /// deliveries of the same ID cannot both observe "not seen".
    pub fn check_and_record(&self, id: &DeliveryId) -> bool {
        let mut inner = self.inner.lock().expect("ledger mutex poisoned");

        if inner.seen.contains(id) {
            return false;
        }

        inner.seen.insert(id.clone());
        inner.order.push_back(id.clone());

        if inner.order.len() > self.capacity {
            self.evict_oldest(&mut inner);
        }

        true
    }

    /// Evicts oldest-first down to capacity minus one batch.
    ///
    /// Keeps at least the entry that triggered the eviction.
    fn evict_oldest(&self, inner: &mut LedgerInner) {
        let batch = (self.capacity / 10).max(1);
        let target = self.capacity.saturating_sub(batch).max(1);

        while inner.order.len() > target {
            if let Some(oldest) = inner.order.pop_front() {
                inner.seen.remove(&oldest);
            }
        }
    }

    /// Returns whether `id` is currently recorded.
    ///
    /// Read-only; does not affect eviction order.
    pub fn contains(&self, id: &DeliveryId) -> bool {
        self.inner
            .lock()
            .expect("ledger mutex poisoned")
            .seen
            .contains(id)
    }

    /// Returns the number of recorded delivery IDs.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("ledger mutex poisoned").order.len()
    }

    /// Returns whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
