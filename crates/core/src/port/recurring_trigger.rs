// Recurring Trigger Port
// Abstraction over the platform's repeating-timer capability

use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked on each firing of a recurring trigger.
pub type FireCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Opaque handle to a registered recurring trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerHandle(u64);

impl TriggerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Recurring trigger capability.
///
/// Implementations fire `on_fire` first after `first_fire`, then every
/// `period` thereafter. Repetition is inexact: coalescing and drift are
/// tolerated.
///
/// Implementations:
/// - TokioTrigger: interval-driven tasks (infra-system)
/// - mocks::ManualTrigger: fired by hand in tests
pub trait RecurringTrigger: Send + Sync {
    /// Register a repeating trigger. The callback may run on any runtime
    /// thread; one firing is awaited to completion before the next is
    /// honored.
    fn schedule_repeating(
        &self,
        first_fire: Duration,
        period: Duration,
        on_fire: FireCallback,
    ) -> TriggerHandle;

    /// Cancel a registration. Unknown or already-cancelled handles are a
    /// safe no-op.
    fn cancel(&self, handle: TriggerHandle);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    /// Manual trigger for tests: registrations are stored and fired on
    /// demand, durations are ignored.
    #[derive(Default)]
    pub struct ManualTrigger {
        registered: Mutex<BTreeMap<u64, FireCallback>>,
        next_id: AtomicU64,
        cancelled: AtomicU64,
    }

    impl ManualTrigger {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of live registrations.
        pub fn active_count(&self) -> usize {
            self.registered.lock().unwrap().len()
        }

        /// Number of cancel() calls that removed a live registration.
        pub fn cancelled_count(&self) -> u64 {
            self.cancelled.load(Ordering::SeqCst)
        }

        /// Clones of the currently registered callbacks. Useful to simulate
        /// an in-flight firing racing with cancellation.
        pub fn live_callbacks(&self) -> Vec<FireCallback> {
            self.registered.lock().unwrap().values().cloned().collect()
        }

        /// Fire every live registration once, awaiting each callback.
        pub async fn fire_all(&self) {
            let callbacks = self.live_callbacks();
            for callback in callbacks {
                callback().await;
            }
        }
    }

    impl RecurringTrigger for ManualTrigger {
        fn schedule_repeating(
            &self,
            _first_fire: Duration,
            _period: Duration,
            on_fire: FireCallback,
        ) -> TriggerHandle {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.registered.lock().unwrap().insert(id, on_fire);
            TriggerHandle::new(id)
        }

        fn cancel(&self, handle: TriggerHandle) {
            if self
                .registered
                .lock()
                .unwrap()
                .remove(&handle.raw())
                .is_some()
            {
                self.cancelled.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}
