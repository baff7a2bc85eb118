//! In-memory marketplace, used by tests and local runs without an API.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    models::{
        Booking, BookingId, BookingStatus, ConsumerId, CreateBookingRequest, ProviderAvailability,
        ProviderId,
    },
    ports::outbound::{MarketplaceClient, RemoteCancellation},
    refund_amount, refund_percentage, BookedSlotKey, BookedSlotSet, BookingError,
};

#[derive(Default)]
struct State {
    availability: HashMap<ProviderId, ProviderAvailability>,
    bookings: Vec<Booking>,
    /// Errors returned, in order, by the next calls of any kind.
    failures: VecDeque<BookingError>,
    omit_refund_fields: bool,
}

/// Marketplace backed by shared in-process state.
///
/// Reservations follow the same rules as the remote service: a slot held by
/// an active booking cannot be reserved again.
#[derive(Clone, Default)]
pub struct InMemoryMarketplace {
    state: Arc<RwLock<State>>,
    calls: Arc<AtomicUsize>,
    next_id: Arc<AtomicUsize>,
}

impl InMemoryMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, provider_id: ProviderId, availability: ProviderAvailability) {
        self.state
            .write()
            .await
            .availability
            .insert(provider_id, availability);
    }

    pub async fn insert_booking(&self, booking: Booking) {
        self.state.write().await.bookings.push(booking);
    }

    /// Makes the next call fail with `error`. Queued errors are consumed in
    /// order.
    pub async fn fail_next(&self, error: BookingError) {
        self.state.write().await.failures.push_back(error);
    }

    /// Answer cancellations without refund details.
    pub async fn omit_refund_fields(&self) {
        self.state.write().await.omit_refund_fields = true;
    }

    pub async fn booking(&self, booking_id: &BookingId) -> Option<Booking> {
        self.state
            .read()
            .await
            .bookings
            .iter()
            .find(|b| &b.id == booking_id)
            .cloned()
    }

    /// Number of calls made through the port, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn begin_call(&self) -> Result<(), BookingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.state.write().await.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn booked_slots_for(bookings: &[Booking], provider_id: &ProviderId) -> BookedSlotSet {
    bookings
        .iter()
        .filter(|b| &b.provider_id == provider_id && b.status.is_active())
        .map(|b| BookedSlotKey::new(b.date, b.time.clone()))
        .collect()
}

#[async_trait]
impl MarketplaceClient for InMemoryMarketplace {
    async fn get_availability(
        &self,
        provider_id: &ProviderId,
    ) -> Result<ProviderAvailability, BookingError> {
        self.begin_call().await?;
        Ok(self
            .state
            .read()
            .await
            .availability
            .get(provider_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_booked_slots(
        &self,
        provider_id: &ProviderId,
    ) -> Result<BookedSlotSet, BookingError> {
        self.begin_call().await?;
        let state = self.state.read().await;
        Ok(booked_slots_for(&state.bookings, provider_id))
    }

    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        self.begin_call().await?;
        let mut state = self.state.write().await;

        if booked_slots_for(&state.bookings, &request.provider_id).contains(request.date, &request.time)
        {
            return Err(BookingError::StaleReservation(format!(
                "{} on {} is no longer available",
                request.time, request.date
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let booking = Booking::new(
            format!("booking-{id}"),
            request.provider_id.clone(),
            request.consumer_id.clone(),
            request.service_id.clone(),
            request.date,
            request.time.clone(),
            request.amount,
        );
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn cancel_booking(
        &self,
        booking_id: &BookingId,
        _reason: Option<&str>,
    ) -> Result<RemoteCancellation, BookingError> {
        self.begin_call().await?;
        let mut state = self.state.write().await;
        let omit_refund_fields = state.omit_refund_fields;

        let booking = state
            .bookings
            .iter_mut()
            .find(|b| &b.id == booking_id)
            .ok_or(BookingError::NotFound)?;
        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::StaleReservation(
                "booking is already cancelled".to_string(),
            ));
        }

        let response = if omit_refund_fields {
            RemoteCancellation {
                message: Some("Booking cancelled".to_string()),
                ..Default::default()
            }
        } else {
            RemoteCancellation {
                refund_amount: Some(refund_amount(booking)),
                refund_percentage: Some(refund_percentage(booking)),
                message: Some("Booking cancelled".to_string()),
            }
        };
        booking.status = BookingStatus::Cancelled;
        Ok(response)
    }

    async fn get_my_bookings(&self, consumer_id: &ConsumerId) -> Result<Vec<Booking>, BookingError> {
        self.begin_call().await?;
        Ok(self
            .state
            .read()
            .await
            .bookings
            .iter()
            .filter(|b| &b.consumer_id == consumer_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::models::ServiceId;

    fn request(time: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            consumer_id: ConsumerId::new("s1"),
            provider_id: ProviderId::new("c1"),
            service_id: ServiceId::new("svc"),
            date: date!(2024 - 03 - 01),
            time: time.to_string(),
            amount: 100.0,
        }
    }

    #[tokio::test]
    async fn second_reservation_of_a_slot_is_stale() {
        let marketplace = InMemoryMarketplace::new();
        marketplace.create_booking(&request("09:00 AM - 10:00 AM")).await.unwrap();

        let err = marketplace.create_booking(&request("09:00 AM")).await.unwrap_err();
        assert!(matches!(err, BookingError::StaleReservation(_)));

        let booked = marketplace.get_booked_slots(&ProviderId::new("c1")).await.unwrap();
        assert_eq!(booked.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_bookings_release_their_slot() {
        let marketplace = InMemoryMarketplace::new();
        let booking = marketplace.create_booking(&request("09:00 AM")).await.unwrap();

        marketplace.cancel_booking(&booking.id, None).await.unwrap();

        let booked = marketplace.get_booked_slots(&ProviderId::new("c1")).await.unwrap();
        assert!(booked.is_empty());
        assert!(marketplace.create_booking(&request("09:00 AM")).await.is_ok());
    }

    #[tokio::test]
    async fn queued_failures_are_returned_in_order() {
        let marketplace = InMemoryMarketplace::new();
        marketplace.fail_next(BookingError::Unauthorized).await;

        let provider = ProviderId::new("c1");
        assert!(matches!(
            marketplace.get_availability(&provider).await,
            Err(BookingError::Unauthorized)
        ));
        assert!(marketplace.get_availability(&provider).await.unwrap().is_empty());
        assert_eq!(marketplace.call_count(), 2);
    }
}
