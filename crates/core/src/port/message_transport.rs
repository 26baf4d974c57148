// Message Transport Port
// Abstraction for the injected delivery capability

use async_trait::async_trait;
use thiserror::Error;

/// Per-firing delivery failure.
///
/// Non-fatal by design: reported to the UI layer as a notice, never cancels
/// the schedule. The next interval is the retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("send permission denied")]
    PermissionDenied,

    #[error("transport failure: {0}")]
    TransportFailure(String),
}

/// Message Transport trait
///
/// Implementations:
/// - WebhookTransport: POSTs to an SMS gateway (infra-system)
/// - LogTransport: logs instead of sending (infra-system, dev default)
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Deliver one text message.
    ///
    /// # Errors
    /// - DeliveryError::TransportFailure if the transport is unavailable or
    ///   rejects the send
    async fn send_text(&self, phone_number: &str, message: &str) -> Result<(), DeliveryError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Mock transport behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always accept
        Success,
        /// Always fail with message
        Fail(String),
    }

    /// Mock Message Transport for testing
    pub struct MockTransport {
        behavior: Mutex<MockBehavior>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockTransport {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Mutex::new(behavior),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        /// Swap behavior mid-test (e.g. fail once, then recover).
        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Recorded (phone_number, message) pairs, in call order.
        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageTransport for MockTransport {
        async fn send_text(&self, phone_number: &str, message: &str) -> Result<(), DeliveryError> {
            self.calls
                .lock()
                .unwrap()
                .push((phone_number.to_string(), message.to_string()));

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockBehavior::Success => Ok(()),
                MockBehavior::Fail(msg) => Err(DeliveryError::TransportFailure(msg)),
            }
        }
    }
}
