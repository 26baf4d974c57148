// Recurring trigger implementation backed by tokio tasks

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use pester_core::port::{FireCallback, RecurringTrigger, TriggerHandle};

/// Recurring trigger running one tokio task per registration.
///
/// Inexact-repeating: missed ticks are skipped rather than delivered in a
/// burst, so firings coalesce under load or clock suspension. One firing is
/// awaited to completion before the next tick is honored.
pub struct TokioTrigger {
    cancellers: Mutex<HashMap<u64, watch::Sender<bool>>>,
    next_id: AtomicU64,
}

impl TokioTrigger {
    pub fn new() -> Self {
        Self {
            cancellers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registrations not yet cancelled.
    pub fn active_count(&self) -> usize {
        self.cancellers.lock().unwrap().len()
    }
}

impl Default for TokioTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl RecurringTrigger for TokioTrigger {
    fn schedule_repeating(
        &self,
        first_fire: Duration,
        period: Duration,
        on_fire: FireCallback,
    ) -> TriggerHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        let mut ticker = interval_at(Instant::now() + first_fire, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        on_fire().await;
                    }
                    // Err means the sender is gone (adapter dropped); the
                    // task stops either way.
                    _ = cancel_rx.changed() => {
                        debug!(trigger_id = %id, "recurring trigger cancelled");
                        break;
                    }
                }
            }
        });

        self.cancellers.lock().unwrap().insert(id, cancel_tx);
        TriggerHandle::new(id)
    }

    fn cancel(&self, handle: TriggerHandle) {
        // Unknown handles are a no-op: teardown must be safe to repeat.
        if let Some(cancel_tx) = self.cancellers.lock().unwrap().remove(&handle.raw()) {
            let _ = cancel_tx.send(true);
        }
    }
}
