// Logging transport (dev default)

use async_trait::async_trait;
use tracing::info;

use pester_core::port::{DeliveryError, MessageTransport};

/// Transport stand-in that logs the would-be message instead of sending it.
/// Used by the daemon when no gateway is configured.
pub struct LogTransport;

#[async_trait]
impl MessageTransport for LogTransport {
    async fn send_text(&self, phone_number: &str, message: &str) -> Result<(), DeliveryError> {
        info!(to = %phone_number, body = %message, "send_text (log transport)");
        Ok(())
    }
}
