use async_trait::async_trait;

use crate::domain::{
    models::{
        Booking, BookingId, CancellationReceipt, ConsumerId, CreateBookingRequest,
        ProviderAvailability, ProviderId,
    },
    BookedSlotSet, BookingError,
};

/// Outbound port for the remote booking marketplace.
///
/// The marketplace is the final authority on reservations. Implementations
/// map their transport failures onto [`BookingError`] so callers can tell a
/// stale reservation from a transient outage.
#[async_trait]
pub trait MarketplaceClient: Send + Sync + 'static {
    /// Published availability of a provider. A provider with nothing
    /// published yields empty availability, not an error.
    async fn get_availability(
        &self,
        provider_id: &ProviderId,
    ) -> Result<ProviderAvailability, BookingError>;

    /// Active reservations held against a provider.
    async fn get_booked_slots(&self, provider_id: &ProviderId)
        -> Result<BookedSlotSet, BookingError>;

    /// Reserves one slot.
    ///
    /// Fails with [`BookingError::StaleReservation`] when the slot was taken
    /// after it was shown.
    async fn create_booking(&self, request: &CreateBookingRequest)
        -> Result<Booking, BookingError>;

    /// Cancels a booking. The receipt holds whatever refund the marketplace
    /// reports; missing fields are left to the caller.
    async fn cancel_booking(
        &self,
        booking_id: &BookingId,
        reason: Option<&str>,
    ) -> Result<RemoteCancellation, BookingError>;

    async fn get_my_bookings(&self, consumer_id: &ConsumerId)
        -> Result<Vec<Booking>, BookingError>;
}

/// Marketplace response to a cancellation, before local fallbacks apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteCancellation {
    pub refund_amount: Option<f64>,
    pub refund_percentage: Option<u8>,
    pub message: Option<String>,
}

impl RemoteCancellation {
    /// Completes the receipt, filling refund fields the marketplace left out.
    pub fn into_receipt(
        self,
        booking_id: BookingId,
        local_amount: f64,
        local_percentage: u8,
    ) -> CancellationReceipt {
        CancellationReceipt {
            booking_id,
            refund_amount: self.refund_amount.unwrap_or(local_amount),
            refund_percentage: self.refund_percentage.unwrap_or(local_percentage),
            message: self.message,
        }
    }
}
