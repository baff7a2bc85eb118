use std::{cmp::Reverse, future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use time::{Date, PrimitiveDateTime};

use crate::domain::{
    bookable_dates, booking_view, check_cancellable, classify_slots, label_start_time,
    models::{
        Booking, BookingView, CancellationReceipt, ConsumerId, CreateBookingRequest, ProviderId,
        SelectedSlot,
    },
    ports::{inbound::BookingFlowService, outbound::MarketplaceClient},
    refund_amount, refund_percentage, resolve_slots_for_date, BookingError, ClassifiedSlot,
    DEFAULT_SESSION_MINUTES,
};

/// Tunables for [`BookingFlowServiceImpl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFlowSettings {
    /// Used when a caller passes a duration of zero.
    pub default_session_minutes: u32,
    pub bookable_horizon_days: u32,
    pub bookable_date_limit: usize,
    /// Total tries for retried calls, the first one included.
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for BookingFlowSettings {
    fn default() -> Self {
        Self {
            default_session_minutes: DEFAULT_SESSION_MINUTES,
            bookable_horizon_days: 180,
            bookable_date_limit: 20,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

/// Implementation of the BookingFlowService inbound port.
///
/// Fetches through a MarketplaceClient (outbound port) and applies the
/// scheduling, conflict and cancellation rules to what comes back.
pub struct BookingFlowServiceImpl<C> {
    client: Arc<C>,
    settings: BookingFlowSettings,
}

impl<C> BookingFlowServiceImpl<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self::with_settings(client, BookingFlowSettings::default())
    }

    pub fn with_settings(client: Arc<C>, settings: BookingFlowSettings) -> Self {
        Self { client, settings }
    }

    fn duration_or_default(&self, duration_minutes: u32) -> u32 {
        if duration_minutes == 0 {
            self.settings.default_session_minutes
        } else {
            duration_minutes
        }
    }

    /// Runs `call` until it succeeds, fails with a non-retryable error, or
    /// `max_attempts` is used up.
    async fn with_retry<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, BookingError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, BookingError>> + Send,
        T: Send,
    {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call().await {
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    tracing::warn!(operation, attempt, max_attempts, error = %e, "retrying after transient failure");
                    tokio::time::sleep(self.settings.retry_backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[async_trait]
impl<C: MarketplaceClient> BookingFlowService for BookingFlowServiceImpl<C> {
    #[tracing::instrument(skip(self, selected), fields(provider = %provider_id))]
    async fn open_slots(
        &self,
        provider_id: &ProviderId,
        date: Date,
        duration_minutes: u32,
        selected: &[SelectedSlot],
    ) -> Result<Vec<ClassifiedSlot>, BookingError> {
        let (availability, booked) = tokio::try_join!(
            self.client.get_availability(provider_id),
            self.client.get_booked_slots(provider_id),
        )?;

        let duration = self.duration_or_default(duration_minutes);
        let candidates = resolve_slots_for_date(date, &availability, duration);
        Ok(classify_slots(&candidates, &booked, selected))
    }

    #[tracing::instrument(skip(self), fields(provider = %provider_id))]
    async fn bookable_dates(
        &self,
        provider_id: &ProviderId,
        today: Date,
        duration_minutes: u32,
    ) -> Result<Vec<Date>, BookingError> {
        let availability = self.client.get_availability(provider_id).await?;

        Ok(bookable_dates(
            &availability,
            today,
            self.duration_or_default(duration_minutes),
            self.settings.bookable_horizon_days,
            self.settings.bookable_date_limit,
        ))
    }

    #[tracing::instrument(skip_all, fields(provider = %request.provider_id, date = %request.date, time = %request.time))]
    async fn reserve_slot(&self, request: &CreateBookingRequest) -> Result<Booking, BookingError> {
        match self.client.create_booking(request).await {
            Err(BookingError::StaleReservation(reason)) => {
                tracing::warn!(%reason, "slot was taken before it could be reserved");
                Err(BookingError::StaleReservation(reason))
            }
            result => result,
        }
    }

    #[tracing::instrument(skip(self), fields(consumer = %consumer_id))]
    async fn my_bookings(
        &self,
        consumer_id: &ConsumerId,
        now: PrimitiveDateTime,
    ) -> Result<Vec<BookingView>, BookingError> {
        let mut bookings = self.client.get_my_bookings(consumer_id).await?;
        bookings.sort_by_key(|b| Reverse((b.date, label_start_time(&b.time))));

        Ok(bookings
            .into_iter()
            .map(|booking| booking_view(booking, now))
            .collect())
    }

    #[tracing::instrument(skip(self, booking, reason), fields(booking = %booking.id))]
    async fn request_cancellation(
        &self,
        booking: &Booking,
        reason: Option<&str>,
        now: PrimitiveDateTime,
    ) -> Result<CancellationReceipt, BookingError> {
        check_cancellable(booking, now)?;

        let remote = self
            .with_retry("cancel_booking", || {
                self.client.cancel_booking(&booking.id, reason)
            })
            .await?;

        let receipt = remote.into_receipt(
            booking.id.clone(),
            refund_amount(booking),
            refund_percentage(booking),
        );
        tracing::info!(
            refund_amount = receipt.refund_amount,
            refund_percentage = receipt.refund_percentage,
            "booking cancelled"
        );
        Ok(receipt)
    }
}
