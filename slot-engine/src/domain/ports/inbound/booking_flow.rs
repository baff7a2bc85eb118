use async_trait::async_trait;
use time::{Date, PrimitiveDateTime};

use crate::domain::{
    models::{
        Booking, BookingView, CancellationReceipt, ConsumerId, CreateBookingRequest, ProviderId,
        SelectedSlot,
    },
    BookingError, ClassifiedSlot,
};

/// Inbound port for the consumer booking flow.
///
/// Orchestrates the marketplace client with the pure scheduling and policy
/// functions.
#[async_trait]
pub trait BookingFlowService: Send + Sync + 'static {
    /// Candidate slots for a date, each classified against current
    /// reservations and the consumer's own picks.
    async fn open_slots(
        &self,
        provider_id: &ProviderId,
        date: Date,
        duration_minutes: u32,
        selected: &[SelectedSlot],
    ) -> Result<Vec<ClassifiedSlot>, BookingError>;

    /// Dates from `today` on with at least one slot.
    async fn bookable_dates(
        &self,
        provider_id: &ProviderId,
        today: Date,
        duration_minutes: u32,
    ) -> Result<Vec<Date>, BookingError>;

    /// Reserves one slot. A slot taken since it was shown fails with
    /// [`BookingError::StaleReservation`]; refresh the slots and pick again.
    async fn reserve_slot(&self, request: &CreateBookingRequest) -> Result<Booking, BookingError>;

    /// The consumer's bookings, most recent first, with cancellation
    /// decisions attached.
    async fn my_bookings(
        &self,
        consumer_id: &ConsumerId,
        now: PrimitiveDateTime,
    ) -> Result<Vec<BookingView>, BookingError>;

    /// Cancels a booking if policy allows it at `now`.
    ///
    /// Refused locally with [`BookingError::PolicyViolation`] before any
    /// remote call.
    async fn request_cancellation(
        &self,
        booking: &Booking,
        reason: Option<&str>,
        now: PrimitiveDateTime,
    ) -> Result<CancellationReceipt, BookingError>;
}
