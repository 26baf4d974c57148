// Recurring Notifier - the scheduling state machine
// Idle --start--> Active --stop--> Idle

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::domain::{CycleId, Notice, ScheduleRequest};
use crate::port::{
    CycleIdProvider, FireCallback, MessageTransport, NoticeSink, PermissionGate, RecurringTrigger,
    TimeProvider, TriggerHandle,
};

/// Scheduler state. The trigger handle and the cycle binding are owned
/// together and released together on every transition to Idle.
enum NotifierState {
    Idle,
    Active {
        request: ScheduleRequest,
        cycle: CycleId,
        handle: TriggerHandle,
        armed_at: i64,
    },
}

/// Snapshot of the scheduler state for the UI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierStatus {
    Idle,
    Active {
        request: ScheduleRequest,
        cycle: CycleId,
        armed_at: i64,
    },
}

impl NotifierStatus {
    /// Label for the UI toggle control.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            NotifierStatus::Idle => "Start",
            NotifierStatus::Active { .. } => "Stop",
        }
    }
}

/// Owns the single recurring schedule: arms the trigger, reacts to firings,
/// tears the cycle down. One instance per composing application; all
/// collaborators are injected ports.
pub struct RecurringNotifier {
    trigger: Arc<dyn RecurringTrigger>,
    transport: Arc<dyn MessageTransport>,
    permission_gate: Arc<dyn PermissionGate>,
    notice_sink: Arc<dyn NoticeSink>,
    time_provider: Arc<dyn TimeProvider>,
    cycle_ids: Arc<dyn CycleIdProvider>,
    state: Arc<Mutex<NotifierState>>,
}

impl RecurringNotifier {
    pub fn new(
        trigger: Arc<dyn RecurringTrigger>,
        transport: Arc<dyn MessageTransport>,
        permission_gate: Arc<dyn PermissionGate>,
        notice_sink: Arc<dyn NoticeSink>,
        time_provider: Arc<dyn TimeProvider>,
        cycle_ids: Arc<dyn CycleIdProvider>,
    ) -> Self {
        Self {
            trigger,
            transport,
            permission_gate,
            notice_sink,
            time_provider,
            cycle_ids,
            state: Arc::new(Mutex::new(NotifierState::Idle)),
        }
    }

    /// Arm the recurring schedule.
    ///
    /// If a schedule is already active it is disarmed first, so at most one
    /// trigger registration exists at any instant. The first firing comes
    /// after one full interval, then every interval thereafter. Returns the
    /// cycle id of the new schedule (opaque, useful for log correlation).
    pub fn start(&self, request: ScheduleRequest) -> CycleId {
        let mut state = self.state.lock().unwrap();

        // Disarm before arm. A start while Active must never leave two
        // registrations behind.
        if let NotifierState::Active { cycle, handle, .. } =
            std::mem::replace(&mut *state, NotifierState::Idle)
        {
            warn!(cycle = %cycle, "start while active, disarming previous schedule");
            self.trigger.cancel(handle);
        }

        let cycle = self.cycle_ids.next_cycle_id();
        let period = request.period();
        let on_fire = make_fire_callback(
            cycle.clone(),
            request.clone(),
            Arc::clone(&self.state),
            Arc::clone(&self.transport),
            Arc::clone(&self.permission_gate),
            Arc::clone(&self.notice_sink),
        );

        let handle = self.trigger.schedule_repeating(period, period, on_fire);
        let armed_at = self.time_provider.now_millis();

        info!(
            cycle = %cycle,
            phone_number = %request.phone_number(),
            interval_minutes = %request.interval_minutes(),
            "Schedule armed"
        );

        *state = NotifierState::Active {
            request,
            cycle: cycle.clone(),
            handle,
            armed_at,
        };
        cycle
    }

    /// Disarm the schedule. Idempotent: a stop while Idle is a no-op, and
    /// stopping twice never double-releases.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        match std::mem::replace(&mut *state, NotifierState::Idle) {
            NotifierState::Active { cycle, handle, .. } => {
                self.trigger.cancel(handle);
                info!(cycle = %cycle, "Schedule disarmed");
            }
            NotifierState::Idle => {
                debug!("stop while idle, nothing to disarm");
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(*self.state.lock().unwrap(), NotifierState::Active { .. })
    }

    pub fn status(&self) -> NotifierStatus {
        match &*self.state.lock().unwrap() {
            NotifierState::Idle => NotifierStatus::Idle,
            NotifierState::Active {
                request,
                cycle,
                armed_at,
                ..
            } => NotifierStatus::Active {
                request: request.clone(),
                cycle: cycle.clone(),
                armed_at: *armed_at,
            },
        }
    }
}

impl Drop for RecurringNotifier {
    // The listener must not outlive the owning lifecycle.
    fn drop(&mut self) {
        self.stop();
    }
}

fn make_fire_callback(
    cycle: CycleId,
    request: ScheduleRequest,
    state: Arc<Mutex<NotifierState>>,
    transport: Arc<dyn MessageTransport>,
    permission_gate: Arc<dyn PermissionGate>,
    notice_sink: Arc<dyn NoticeSink>,
) -> FireCallback {
    Arc::new(move || {
        let cycle = cycle.clone();
        let request = request.clone();
        let state = Arc::clone(&state);
        let transport = Arc::clone(&transport);
        let permission_gate = Arc::clone(&permission_gate);
        let notice_sink = Arc::clone(&notice_sink);
        async move {
            dispatch_firing(
                &cycle,
                &request,
                &state,
                transport.as_ref(),
                permission_gate.as_ref(),
                notice_sink.as_ref(),
            )
            .await;
        }
        .boxed()
    })
}

/// Handle one firing: discard if stale, gate on permission, deliver, report.
/// Delivery failures become notices, never cancellations or panics.
async fn dispatch_firing(
    cycle: &CycleId,
    request: &ScheduleRequest,
    state: &Mutex<NotifierState>,
    transport: &dyn MessageTransport,
    permission_gate: &dyn PermissionGate,
    notice_sink: &dyn NoticeSink,
) {
    // A firing whose cycle is no longer the active one raced with stop() or
    // a restart; it must not deliver.
    let live = matches!(
        &*state.lock().unwrap(),
        NotifierState::Active { cycle: active, .. } if active == cycle
    );
    if !live {
        debug!(cycle = %cycle, "stale firing discarded");
        return;
    }

    if !permission_gate.has_send_permission() {
        warn!(cycle = %cycle, "firing skipped, send permission missing");
        notice_sink.notify(Notice::PermissionRequired);
        return;
    }

    match transport
        .send_text(request.phone_number(), request.message())
        .await
    {
        Ok(()) => {
            info!(
                cycle = %cycle,
                phone_number = %request.phone_number(),
                "Message delivered"
            );
            notice_sink.notify(Notice::Delivered {
                phone_number: request.phone_number().to_string(),
            });
        }
        Err(e) => {
            // Non-fatal: the schedule keeps firing, the next interval is the
            // retry.
            warn!(cycle = %cycle, error = %e, "Delivery failed");
            notice_sink.notify(Notice::DeliveryFailed {
                reason: e.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::cycle_id::mocks::SequentialCycleIds;
    use crate::port::message_transport::mocks::{MockBehavior, MockTransport};
    use crate::port::notice_sink::mocks::RecordingNoticeSink;
    use crate::port::recurring_trigger::mocks::ManualTrigger;
    use crate::port::time_provider::mocks::FixedTime;
    use crate::port::StaticPermissionGate;

    struct Harness {
        trigger: Arc<ManualTrigger>,
        transport: Arc<MockTransport>,
        notices: Arc<RecordingNoticeSink>,
        notifier: RecurringNotifier,
    }

    fn harness(transport: MockTransport, gate: StaticPermissionGate) -> Harness {
        let trigger = Arc::new(ManualTrigger::new());
        let transport = Arc::new(transport);
        let notices = Arc::new(RecordingNoticeSink::new());
        let notifier = RecurringNotifier::new(
            trigger.clone(),
            transport.clone(),
            Arc::new(gate),
            notices.clone(),
            Arc::new(FixedTime(1_000)),
            Arc::new(SequentialCycleIds::default()),
        );
        Harness {
            trigger,
            transport,
            notices,
            notifier,
        }
    }

    fn request() -> ScheduleRequest {
        ScheduleRequest::validate("Hi", "5551234", "5").unwrap()
    }

    #[test]
    fn test_start_arms_single_registration() {
        let h = harness(MockTransport::new_success(), StaticPermissionGate::granted());
        assert!(!h.notifier.is_active());

        let cycle = h.notifier.start(request());
        assert_eq!(cycle, "cycle-1");
        assert!(h.notifier.is_active());
        assert_eq!(h.trigger.active_count(), 1);
    }

    #[tokio::test]
    async fn test_firing_delivers_payload_exactly_once() {
        let h = harness(MockTransport::new_success(), StaticPermissionGate::granted());
        h.notifier.start(request());

        h.trigger.fire_all().await;

        assert_eq!(h.transport.call_count(), 1);
        assert_eq!(
            h.transport.calls(),
            vec![("5551234".to_string(), "Hi".to_string())]
        );
        assert_eq!(
            h.notices.notices(),
            vec![Notice::Delivered {
                phone_number: "5551234".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_delivery_failure_is_non_fatal() {
        let h = harness(
            MockTransport::new_fail("gateway down"),
            StaticPermissionGate::granted(),
        );
        h.notifier.start(request());

        h.trigger.fire_all().await;

        assert!(h.notifier.is_active(), "failure must not cancel the schedule");
        assert_eq!(
            h.notices.notices(),
            vec![Notice::DeliveryFailed {
                reason: "transport failure: gateway down".to_string()
            }]
        );

        // Keeps firing on schedule; recovery needs no re-arm.
        h.transport.set_behavior(MockBehavior::Success);
        h.trigger.fire_all().await;
        assert_eq!(h.transport.call_count(), 2);
        assert_eq!(
            h.notices.notices().last(),
            Some(&Notice::Delivered {
                phone_number: "5551234".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_permission_denied_skips_transport() {
        let h = harness(MockTransport::new_success(), StaticPermissionGate::denied());
        h.notifier.start(request());

        h.trigger.fire_all().await;

        assert_eq!(h.transport.call_count(), 0);
        assert_eq!(h.notices.notices(), vec![Notice::PermissionRequired]);
        assert!(h.notifier.is_active(), "denial must not cancel the schedule");
    }

    #[tokio::test]
    async fn test_stop_leaves_idle_with_no_registrations() {
        let h = harness(MockTransport::new_success(), StaticPermissionGate::granted());
        h.notifier.start(request());
        h.notifier.stop();

        assert!(!h.notifier.is_active());
        assert_eq!(h.trigger.active_count(), 0);

        h.trigger.fire_all().await;
        assert_eq!(h.transport.call_count(), 0);
    }

    #[test]
    fn test_stop_while_idle_is_noop() {
        let h = harness(MockTransport::new_success(), StaticPermissionGate::granted());

        h.notifier.stop();
        h.notifier.stop();

        assert!(!h.notifier.is_active());
        assert_eq!(h.trigger.cancelled_count(), 0);
    }

    #[test]
    fn test_stop_twice_never_double_releases() {
        let h = harness(MockTransport::new_success(), StaticPermissionGate::granted());
        h.notifier.start(request());

        h.notifier.stop();
        h.notifier.stop();

        assert_eq!(h.trigger.cancelled_count(), 1);
        assert_eq!(h.trigger.active_count(), 0);
    }

    #[tokio::test]
    async fn test_restart_disarms_before_arming() {
        let h = harness(MockTransport::new_success(), StaticPermissionGate::granted());
        h.notifier.start(request());
        let stale = h.trigger.live_callbacks();

        let second = ScheduleRequest::validate("Update", "5559876", "2").unwrap();
        h.notifier.start(second);

        assert_eq!(h.trigger.active_count(), 1, "old registration must be gone");
        assert_eq!(h.trigger.cancelled_count(), 1);

        h.trigger.fire_all().await;
        assert_eq!(
            h.transport.calls(),
            vec![("5559876".to_string(), "Update".to_string())]
        );

        // A late firing of the superseded cycle is discarded.
        stale[0]().await;
        assert_eq!(h.transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_firing_after_stop_is_discarded() {
        let h = harness(MockTransport::new_success(), StaticPermissionGate::granted());
        h.notifier.start(request());
        let stale = h.trigger.live_callbacks();

        h.notifier.stop();
        stale[0]().await;

        assert_eq!(h.transport.call_count(), 0);
        assert!(h.notices.notices().is_empty());
    }

    #[test]
    fn test_drop_releases_like_stop() {
        let trigger = Arc::new(ManualTrigger::new());
        let notifier = RecurringNotifier::new(
            trigger.clone(),
            Arc::new(MockTransport::new_success()),
            Arc::new(StaticPermissionGate::granted()),
            Arc::new(RecordingNoticeSink::new()),
            Arc::new(FixedTime(1_000)),
            Arc::new(SequentialCycleIds::default()),
        );
        notifier.start(request());
        assert_eq!(trigger.active_count(), 1);

        drop(notifier);
        assert_eq!(trigger.active_count(), 0);
    }

    #[test]
    fn test_status_snapshot_and_toggle_label() {
        let h = harness(MockTransport::new_success(), StaticPermissionGate::granted());
        assert_eq!(h.notifier.status(), NotifierStatus::Idle);
        assert_eq!(h.notifier.status().toggle_label(), "Start");

        h.notifier.start(request());
        let status = h.notifier.status();
        assert_eq!(status.toggle_label(), "Stop");
        match status {
            NotifierStatus::Active {
                request,
                cycle,
                armed_at,
            } => {
                assert_eq!(request.message(), "Hi");
                assert_eq!(cycle, "cycle-1");
                assert_eq!(armed_at, 1_000);
            }
            NotifierStatus::Idle => panic!("expected active status"),
        }
    }
}
