//! Cancellation and refund rules for bookings.
//!
//! Refunds have two tiers: full while the provider has not accepted, and a
//! flat fee once they have. There is no time decay.

use thiserror::Error;
use time::PrimitiveDateTime;

use crate::domain::{
    label_start_time,
    models::{Booking, BookingStatus, BookingView},
};

pub const FULL_REFUND_PERCENT: u8 = 100;
pub const COMMITTED_REFUND_PERCENT: u8 = 80;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("booking is already cancelled")]
    AlreadyCancelled,
    #[error("booking is already completed")]
    AlreadyCompleted,
    #[error("session has already started")]
    SessionStarted,
}

/// When the booked session begins, taken from the start of its slot label.
pub fn scheduled_start(booking: &Booking) -> Option<PrimitiveDateTime> {
    label_start_time(&booking.time).map(|start| PrimitiveDateTime::new(booking.date, start.to_time()))
}

/// Explains why `booking` cannot be cancelled at `now`, if it cannot.
///
/// An accepted booking whose start time cannot be read is treated as not yet
/// started.
pub fn check_cancellable(booking: &Booking, now: PrimitiveDateTime) -> Result<(), PolicyViolation> {
    match booking.status {
        BookingStatus::Cancelled => Err(PolicyViolation::AlreadyCancelled),
        BookingStatus::Completed => Err(PolicyViolation::AlreadyCompleted),
        // `approved` is the older spelling of `accepted` and gets the same cutoff.
        status if status.is_provider_committed() => match scheduled_start(booking) {
            Some(start) if now >= start => Err(PolicyViolation::SessionStarted),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

pub fn can_cancel(booking: &Booking, now: PrimitiveDateTime) -> bool {
    check_cancellable(booking, now).is_ok()
}

pub fn refund_percentage(booking: &Booking) -> u8 {
    match booking.status {
        BookingStatus::Pending | BookingStatus::Confirmed => FULL_REFUND_PERCENT,
        BookingStatus::Accepted | BookingStatus::Approved => COMMITTED_REFUND_PERCENT,
        _ => FULL_REFUND_PERCENT,
    }
}

pub fn refund_amount(booking: &Booking) -> f64 {
    booking.amount * f64::from(refund_percentage(booking)) / 100.0
}

pub fn cancellation_fee(booking: &Booking) -> f64 {
    booking.amount - refund_amount(booking)
}

pub fn booking_view(booking: Booking, now: PrimitiveDateTime) -> BookingView {
    BookingView {
        can_cancel: can_cancel(&booking, now),
        refund_percentage: refund_percentage(&booking),
        refund_amount: refund_amount(&booking),
        booking,
    }
}
