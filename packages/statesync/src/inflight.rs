//! Inflight tracking of runner instances.
//!
//! The store counts scheduled runner instances per correlation ID and in
//! total. Because actions dispatched by a runner inherit its correlation and
//! are scheduled (incremented) before the runner itself finishes
//! (decrements), a correlation only reaches zero once every cascading
//! runner is done. That is what `dispatch_and_await` and `settled` wait for.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Notify;

use crate::core::CorrelationId;

/// Entry tracking inflight work for a single correlation ID.
struct InflightEntry {
    count: AtomicUsize,
    notify: Notify,
}

impl InflightEntry {
    fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
            notify: Notify::new(),
        }
    }
}

/// Tracks scheduled runner instances per correlation ID.
#[derive(Default)]
pub struct InflightTracker {
    entries: DashMap<CorrelationId, Arc<InflightEntry>>,
    total: AtomicUsize,
    idle: Notify,
}

impl InflightTracker {
    /// Create a new inflight tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the inflight count for a correlation ID.
    pub fn inc(&self, cid: CorrelationId, n: usize) {
        // Hold the shard lock while incrementing so `dec` cannot remove the
        // entry between lookup and increment.
        let entry = self
            .entries
            .entry(cid)
            .or_insert_with(|| Arc::new(InflightEntry::new()));
        entry.count.fetch_add(n, Ordering::AcqRel);
        self.total.fetch_add(n, Ordering::AcqRel);
    }

    /// Decrement the inflight count for a correlation ID.
    ///
    /// Wakes waiters and drops the entry when the count reaches zero.
    pub fn dec(&self, cid: CorrelationId, n: usize) {
        let reached_zero = match self.entries.get(&cid) {
            Some(entry) => entry.count.fetch_sub(n, Ordering::AcqRel) == n,
            None => false,
        };

        if reached_zero {
            if let Some((_, entry)) = self
                .entries
                .remove_if(&cid, |_, e| e.count.load(Ordering::Acquire) == 0)
            {
                entry.notify.notify_waiters();
            }
        }

        if self.total.fetch_sub(n, Ordering::AcqRel) == n {
            self.idle.notify_waiters();
        }
    }

    /// Wait until no work is pending for the correlation ID.
    ///
    /// Returns immediately when nothing was ever scheduled for it.
    pub async fn wait_zero(&self, cid: CorrelationId) {
        loop {
            let entry = match self.entries.get(&cid) {
                None => return,
                Some(entry_ref) => entry_ref.clone(),
            };

            // Register for notification BEFORE checking count
            let notified = entry.notify.notified();

            if entry.count.load(Ordering::Acquire) == 0 {
                return;
            }

            notified.await;
        }
    }

    /// Wait until no runner instance is pending anywhere.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.total.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Check if there's pending work (count > 0) for a correlation ID.
    pub fn has_pending_work(&self, cid: CorrelationId) -> bool {
        self.entries
            .get(&cid)
            .map(|e| e.count.load(Ordering::Acquire) > 0)
            .unwrap_or(false)
    }

    /// Total number of pending runner instances.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    /// Number of correlations with pending work.
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for InflightTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InflightTracker")
            .field("active_correlations", &self.entries.len())
            .field("total", &self.total())
            .finish()
    }
}

/// RAII guard that decrements the inflight count on drop.
///
/// Ensures the count is released even when a runner is cancelled or panics.
pub(crate) struct InflightGuard {
    tracker: Arc<InflightTracker>,
    cid: CorrelationId,
}

impl InflightGuard {
    /// Take over one unit already counted by the scheduler.
    pub(crate) fn adopt(tracker: Arc<InflightTracker>, cid: CorrelationId) -> Self {
        Self { tracker, cid }
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.tracker.dec(self.cid, 1);
    }
}
