// Tracing-backed notice sink

use tracing::{info, warn};

use pester_core::domain::Notice;
use pester_core::port::NoticeSink;

/// Surfaces per-firing notices as log lines.
pub struct LogNoticeSink;

impl NoticeSink for LogNoticeSink {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::Delivered { .. } => info!(notice = %notice, "delivery notice"),
            Notice::DeliveryFailed { .. } | Notice::PermissionRequired => {
                warn!(notice = %notice, "delivery notice");
            }
        }
    }
}
