// Pester Infrastructure - System Adapters
// Implements: RecurringTrigger, MessageTransport, NoticeSink

pub mod log_notice_sink;
pub mod log_transport;
pub mod tokio_trigger;
pub mod webhook_transport;

pub use log_notice_sink::LogNoticeSink;
pub use log_transport::LogTransport;
pub use tokio_trigger::TokioTrigger;
pub use webhook_transport::{WebhookTransport, WebhookTransportConfig};
