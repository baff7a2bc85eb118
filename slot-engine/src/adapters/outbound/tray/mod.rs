mod conversions;

use async_trait::async_trait;

use crate::config::ApiSettings;
use crate::domain::{
    models::{Booking, BookingId, ConsumerId, CreateBookingRequest, ProviderAvailability, ProviderId},
    ports::outbound::{MarketplaceClient, RemoteCancellation},
    BookedSlotSet, BookingError,
};

use self::conversions::{
    to_create_payload, to_created_booking, to_domain_availability, to_domain_booked_slots,
    to_domain_bookings, to_remote_cancellation,
};

/// Adapter that wraps the Tray client to implement the MarketplaceClient port.
pub struct TrayAdapter {
    client: tray::TrayClient,
}

impl TrayAdapter {
    pub fn new(client: tray::TrayClient) -> Self {
        Self { client }
    }

    /// Create an adapter for the API at `base_url`.
    pub fn connect(base_url: &str, credentials: tray::Credentials) -> Result<Self, BookingError> {
        let client = tray::TrayClient::new(base_url, credentials)
            .map_err(|e| BookingError::MalformedInput(e.to_string()))?;
        Ok(Self::new(client))
    }

    pub fn from_settings(
        api: &ApiSettings,
        credentials: tray::Credentials,
    ) -> Result<Self, BookingError> {
        Self::connect(&api.base_url, credentials)
    }
}

#[async_trait]
impl MarketplaceClient for TrayAdapter {
    async fn get_availability(
        &self,
        provider_id: &ProviderId,
    ) -> Result<ProviderAvailability, BookingError> {
        let raw = self
            .client
            .fetch_availability(provider_id.as_str())
            .await
            .map_err(map_tray_error)?;
        Ok(to_domain_availability(raw))
    }

    async fn get_booked_slots(
        &self,
        provider_id: &ProviderId,
    ) -> Result<BookedSlotSet, BookingError> {
        let raw = self
            .client
            .fetch_booked_slots(provider_id.as_str())
            .await
            .map_err(map_tray_error)?;
        Ok(to_domain_booked_slots(raw))
    }

    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let response = self
            .client
            .create_booking(&to_create_payload(request))
            .await
            .map_err(map_tray_error)?;
        Ok(to_created_booking(request, response))
    }

    async fn cancel_booking(
        &self,
        booking_id: &BookingId,
        reason: Option<&str>,
    ) -> Result<RemoteCancellation, BookingError> {
        let payload = tray::CancelBookingPayload {
            reason: reason.map(str::to_string),
        };
        let response = self
            .client
            .cancel_booking(booking_id.as_str(), &payload)
            .await
            .map_err(map_tray_error)?;
        Ok(to_remote_cancellation(response))
    }

    async fn get_my_bookings(&self, consumer_id: &ConsumerId) -> Result<Vec<Booking>, BookingError> {
        let raw = self
            .client
            .fetch_student_bookings(consumer_id.as_str())
            .await
            .map_err(map_tray_error)?;
        Ok(to_domain_bookings(raw))
    }
}

fn map_tray_error(e: tray::TrayFetchError) -> BookingError {
    match e {
        tray::TrayFetchError::Unauthorized => BookingError::Unauthorized,
        tray::TrayFetchError::NotFound => BookingError::NotFound,
        tray::TrayFetchError::Conflict(msg) => BookingError::StaleReservation(msg),
        e if e.is_transient() => BookingError::Transient(e.to_string()),
        tray::TrayFetchError::ParsingError(msg) => BookingError::unknown(msg),
        e => BookingError::unknown(e.to_string()),
    }
}
