use thiserror::Error;

use crate::domain::PolicyViolation;

/// Errors that can occur during booking operations.
#[derive(Debug, Clone, Error)]
pub enum BookingError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("cancellation refused: {0}")]
    PolicyViolation(#[from] PolicyViolation),
    /// The marketplace rejected a change because local state is outdated,
    /// typically a slot taken since it was shown. Refresh and retry.
    #[error("stale reservation: {0}")]
    StaleReservation(String),
    #[error("not found")]
    NotFound,
    #[error("authentication failed")]
    Unauthorized,
    #[error("marketplace temporarily unavailable: {0}")]
    Transient(String),
    #[error("{0}")]
    Unknown(String),
}

impl BookingError {
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(BookingError::Transient("503".into()).is_retryable());
        assert!(!BookingError::StaleReservation("taken".into()).is_retryable());
        assert!(!BookingError::from(PolicyViolation::SessionStarted).is_retryable());
        assert!(!BookingError::unknown("boom").is_retryable());
    }
}
