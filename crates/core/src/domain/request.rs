// Schedule Request Domain Model

use serde::Serialize;
use std::time::Duration;

use crate::domain::error::{Result, ValidationError};

/// Cycle ID - binds a trigger registration to the start() call that armed it
pub type CycleId = String;

const SECONDS_PER_MINUTE: u64 = 60;

/// An accepted schedule: message body, destination, repeat interval.
///
/// Constructed only through [`ScheduleRequest::validate`] and immutable once
/// accepted. Invariants: non-empty message, non-empty phone number,
/// interval > 0 minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRequest {
    message: String,
    phone_number: String,
    interval_minutes: i64,
}

impl ScheduleRequest {
    /// Validate raw user input into an accepted request.
    ///
    /// Checks short-circuit in order: message, phone number, interval
    /// format, interval sign. The first failing check is the reported error.
    /// The interval is parsed as-is, without trimming.
    pub fn validate(message: &str, phone_number: &str, raw_interval: &str) -> Result<Self> {
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if phone_number.is_empty() {
            return Err(ValidationError::EmptyPhoneNumber);
        }
        let interval_minutes: i64 = raw_interval
            .parse()
            .map_err(|_| ValidationError::NotANumber)?;
        if interval_minutes <= 0 {
            return Err(ValidationError::NonPositiveInterval);
        }

        Ok(Self {
            message: message.to_string(),
            phone_number: phone_number.to_string(),
            interval_minutes,
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn interval_minutes(&self) -> i64 {
        self.interval_minutes
    }

    /// Repeat period of the schedule.
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.interval_minutes as u64 * SECONDS_PER_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req = ScheduleRequest::validate("Hi", "5551234", "5").unwrap();
        assert_eq!(req.message(), "Hi");
        assert_eq!(req.phone_number(), "5551234");
        assert_eq!(req.interval_minutes(), 5);
        assert_eq!(req.period(), Duration::from_secs(300));
    }

    #[test]
    fn test_empty_message_rejected() {
        assert_eq!(
            ScheduleRequest::validate("", "5551234", "5").unwrap_err(),
            ValidationError::EmptyMessage
        );
    }

    #[test]
    fn test_empty_phone_number_rejected() {
        assert_eq!(
            ScheduleRequest::validate("Hi", "", "5").unwrap_err(),
            ValidationError::EmptyPhoneNumber
        );
    }

    #[test]
    fn test_non_numeric_interval_rejected() {
        for raw in ["", "abc", "5.5", " 5", "1e3"] {
            assert_eq!(
                ScheduleRequest::validate("Hi", "5551234", raw).unwrap_err(),
                ValidationError::NotANumber,
                "expected NotANumber for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_non_positive_interval_rejected() {
        assert_eq!(
            ScheduleRequest::validate("Hi", "5551234", "0").unwrap_err(),
            ValidationError::NonPositiveInterval
        );
        assert_eq!(
            ScheduleRequest::validate("Hi", "5551234", "-3").unwrap_err(),
            ValidationError::NonPositiveInterval
        );
    }

    #[test]
    fn test_checks_short_circuit_in_order() {
        // Message outranks phone number outranks interval.
        assert_eq!(
            ScheduleRequest::validate("", "", "x").unwrap_err(),
            ValidationError::EmptyMessage
        );
        assert_eq!(
            ScheduleRequest::validate("Hi", "", "x").unwrap_err(),
            ValidationError::EmptyPhoneNumber
        );
        assert_eq!(
            ScheduleRequest::validate("Hi", "5551234", "x").unwrap_err(),
            ValidationError::NotANumber
        );
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(
            ValidationError::EmptyMessage.to_string(),
            "message cannot be empty"
        );
        assert_eq!(
            ValidationError::EmptyPhoneNumber.to_string(),
            "phone number cannot be empty"
        );
        assert_eq!(
            ValidationError::NotANumber.to_string(),
            "interval must be a number"
        );
        assert_eq!(
            ValidationError::NonPositiveInterval.to_string(),
            "interval must be greater than 0"
        );
    }
}
