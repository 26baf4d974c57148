// Domain Error Types

use thiserror::Error;

/// Start-time validation failure.
///
/// Reported synchronously to the UI layer; a failing request never reaches
/// the scheduler. Display texts are the user-facing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("phone number cannot be empty")]
    EmptyPhoneNumber,

    #[error("interval must be a number")]
    NotANumber,

    #[error("interval must be greater than 0")]
    NonPositiveInterval,
}

pub type Result<T> = std::result::Result<T, ValidationError>;
