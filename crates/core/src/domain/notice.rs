// Per-Firing Notices (UI-facing)

use serde::{Deserialize, Serialize};

/// Outcome of one firing, reported asynchronously to the UI layer.
///
/// Notices are informational; none of them cancels the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notice {
    Delivered { phone_number: String },
    DeliveryFailed { reason: String },
    PermissionRequired,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Delivered { phone_number } => write!(f, "message sent to {}", phone_number),
            Notice::DeliveryFailed { reason } => write!(f, "failed to send message: {}", reason),
            Notice::PermissionRequired => write!(f, "send permission required"),
        }
    }
}
