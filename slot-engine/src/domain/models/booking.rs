use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::{Date, OffsetDateTime};

use super::{BookingId, ConsumerId, ProviderId, SelectedSlot, ServiceId};

/// Lifecycle status of a booking as recorded by the marketplace.
///
/// `approved` is an older spelling of `accepted`. `confirmed` is recorded
/// before the provider has accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Accepted,
    Approved,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Whether the provider has committed to the session.
    pub fn is_provider_committed(self) -> bool {
        matches!(self, BookingStatus::Accepted | BookingStatus::Approved)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether the booking still holds its slot.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            BookingStatus::Pending
                | BookingStatus::Confirmed
                | BookingStatus::Accepted
                | BookingStatus::Approved
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub provider_id: ProviderId,
    pub consumer_id: ConsumerId,
    pub service_id: ServiceId,
    pub date: Date,
    /// Slot label the booking was created with.
    pub time: String,
    pub amount: f64,
    pub status: BookingStatus,
    pub payment_status: String,
    pub created_at: Option<OffsetDateTime>,
}

impl Booking {
    pub fn new(
        id: impl Into<BookingId>,
        provider_id: impl Into<ProviderId>,
        consumer_id: impl Into<ConsumerId>,
        service_id: impl Into<ServiceId>,
        date: Date,
        time: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: provider_id.into(),
            consumer_id: consumer_id.into(),
            service_id: service_id.into(),
            date,
            time: time.into(),
            amount,
            status: BookingStatus::Pending,
            payment_status: "unpaid".to_string(),
            created_at: None,
        }
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_payment_status(mut self, payment_status: impl Into<String>) -> Self {
        self.payment_status = payment_status.into();
        self
    }

    pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Request to reserve one slot with a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBookingRequest {
    pub consumer_id: ConsumerId,
    pub provider_id: ProviderId,
    pub service_id: ServiceId,
    pub date: Date,
    pub time: String,
    pub amount: f64,
}

impl CreateBookingRequest {
    pub fn for_slot(
        consumer_id: ConsumerId,
        provider_id: ProviderId,
        service_id: ServiceId,
        slot: &SelectedSlot,
        amount: f64,
    ) -> Self {
        Self {
            consumer_id,
            provider_id,
            service_id,
            date: slot.date,
            time: slot.label(),
            amount,
        }
    }
}

/// Refund granted for a cancelled booking.
#[derive(Debug, Clone, PartialEq)]
pub struct CancellationReceipt {
    pub booking_id: BookingId,
    pub refund_amount: f64,
    pub refund_percentage: u8,
    pub message: Option<String>,
}

/// A booking annotated with the cancellation decisions for display.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingView {
    pub booking: Booking,
    pub can_cancel: bool,
    pub refund_percentage: u8,
    pub refund_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Accepted".parse::<BookingStatus>().unwrap(), BookingStatus::Accepted);
        assert_eq!("CANCELLED".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert!("rescheduled".parse::<BookingStatus>().is_err());
        assert_eq!(BookingStatus::Approved.to_string(), "approved");
    }

    #[test]
    fn status_groups() {
        assert!(BookingStatus::Approved.is_provider_committed());
        assert!(!BookingStatus::Confirmed.is_provider_committed());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(BookingStatus::Confirmed.is_active());
    }
}
