// Cycle ID Provider Port (for deterministic testing)

use crate::domain::CycleId;

/// Generates the unique identifier that binds a trigger registration to the
/// start() call that armed it. Firings from a superseded cycle are discarded
/// by the notifier, so listeners are never duplicated across restarts.
pub trait CycleIdProvider: Send + Sync {
    fn next_cycle_id(&self) -> CycleId;
}

/// UUID v4 provider (production)
pub struct UuidCycleIdProvider;

impl CycleIdProvider for UuidCycleIdProvider {
    fn next_cycle_id(&self) -> CycleId {
        uuid::Uuid::new_v4().to_string()
    }
}

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Sequential ids (cycle-1, cycle-2, ...) for deterministic tests.
    #[derive(Default)]
    pub struct SequentialCycleIds(AtomicU64);

    impl CycleIdProvider for SequentialCycleIds {
        fn next_cycle_id(&self) -> CycleId {
            format!("cycle-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }
}
