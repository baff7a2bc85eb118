use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    Weekday,
};

use crate::domain::{
    models::{
        AvailabilityWindow, Booking, BookingStatus, CreateBookingRequest, DatedSlotList,
        LegacyWeeklyAvailability, ProviderAvailability,
    },
    parse_to_minutes,
    ports::outbound::RemoteCancellation,
    BookedSlotKey, BookedSlotSet, BookingError,
};

/// Parse a `YYYY-MM-DD` date. A trailing time component is ignored.
pub fn parse_date(raw: &str) -> Result<Date, BookingError> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    Date::parse(day, format_description!("[year]-[month]-[day]"))
        .map_err(|e| BookingError::MalformedInput(format!("invalid date {raw:?}: {e}")))
}

fn parse_weekday(raw: &str) -> Option<Weekday> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Monday),
        "tuesday" => Some(Weekday::Tuesday),
        "wednesday" => Some(Weekday::Wednesday),
        "thursday" => Some(Weekday::Thursday),
        "friday" => Some(Weekday::Friday),
        "saturday" => Some(Weekday::Saturday),
        "sunday" => Some(Weekday::Sunday),
        _ => None,
    }
}

pub fn to_domain_window(raw: &tray::RawAvailabilityWindow) -> Result<AvailabilityWindow, BookingError> {
    let date = parse_date(&raw.date)?;
    let start = parse_to_minutes(&raw.start_time).ok_or_else(|| {
        BookingError::MalformedInput(format!("invalid start time {:?}", raw.start_time))
    })?;
    let end = parse_to_minutes(&raw.end_time).ok_or_else(|| {
        BookingError::MalformedInput(format!("invalid end time {:?}", raw.end_time))
    })?;
    Ok(AvailabilityWindow::new(date, start, end))
}

/// Convert a published availability document. Malformed windows, dates and
/// weekday keys are logged and skipped so the rest stays usable.
pub fn to_domain_availability(raw: tray::RawAvailability) -> ProviderAvailability {
    let mut availability = ProviderAvailability::new();

    for window in &raw.availability_windows {
        match to_domain_window(window) {
            Ok(window) => availability.windows.push(window),
            Err(e) => tracing::warn!(error = %e, "skipping availability window"),
        }
    }

    for dated in raw.availability_slots {
        match parse_date(&dated.date) {
            Ok(date) => availability
                .dated_slots
                .push(DatedSlotList::new(date, dated.time_slots)),
            Err(e) => tracing::warn!(error = %e, "skipping dated slot list"),
        }
    }

    if let Some(days) = raw.availability {
        let mut weekly = LegacyWeeklyAvailability::new();
        for (day, slots) in days {
            match parse_weekday(&day) {
                Some(weekday) => weekly.insert(weekday, slots),
                None => tracing::warn!(day = %day, "skipping unknown weekday in weekly availability"),
            }
        }
        if !weekly.is_empty() {
            availability.weekly = Some(weekly);
        }
    }

    if !raw.available && !availability.is_empty() {
        tracing::debug!("availability marked unavailable but carries slot data, using the data");
    }

    availability
}

pub fn to_domain_booked_slots(raw: tray::RawBookedSlotsResponse) -> BookedSlotSet {
    raw.booked_slots
        .into_iter()
        .filter_map(|slot| match parse_date(&slot.date) {
            Ok(date) => Some(BookedSlotKey::new(date, slot.time)),
            Err(e) => {
                tracing::warn!(error = %e, booking_id = ?slot.booking_id, "skipping booked slot");
                None
            }
        })
        .collect()
}

pub fn to_domain_booking(raw: tray::RawBooking) -> Result<Booking, BookingError> {
    let date = parse_date(&raw.date)?;
    let status: BookingStatus = raw.status.parse().map_err(|_| {
        BookingError::MalformedInput(format!("unknown booking status {:?}", raw.status))
    })?;

    let mut booking = Booking::new(
        raw.id,
        raw.consultant_id,
        raw.student_id,
        raw.service_id,
        date,
        raw.time,
        raw.amount,
    )
    .with_status(status)
    .with_payment_status(raw.payment_status);

    if let Some(created_at) = raw.created_at {
        match OffsetDateTime::parse(&created_at, &Rfc3339) {
            Ok(ts) => booking = booking.with_created_at(ts),
            Err(e) => tracing::debug!(%created_at, error = %e, "ignoring unparseable createdAt"),
        }
    }

    Ok(booking)
}

/// Convert a list of bookings, logging and skipping records that do not parse.
pub fn to_domain_bookings(raw: Vec<tray::RawBooking>) -> Vec<Booking> {
    raw.into_iter()
        .filter_map(|b| {
            let id = b.id.clone();
            to_domain_booking(b)
                .map_err(|e| tracing::warn!(booking_id = %id, error = %e, "skipping booking"))
                .ok()
        })
        .collect()
}

pub fn to_create_payload(request: &CreateBookingRequest) -> tray::CreateBookingPayload {
    tray::CreateBookingPayload::new(
        request.provider_id.to_string(),
        request.service_id.to_string(),
        request.date.to_string(),
        request.time.clone(),
        request.amount,
    )
}

/// The marketplace only returns the new id, so the booking is rebuilt from
/// the request in its initial state.
pub fn to_created_booking(
    request: &CreateBookingRequest,
    response: tray::CreateBookingResponse,
) -> Booking {
    Booking::new(
        response.booking_id,
        request.provider_id.clone(),
        request.consumer_id.clone(),
        request.service_id.clone(),
        request.date,
        request.time.clone(),
        request.amount,
    )
}

pub fn to_remote_cancellation(response: tray::CancelBookingResponse) -> RemoteCancellation {
    RemoteCancellation {
        refund_amount: response.refund_amount,
        refund_percentage: response.refund_percentage,
        message: response.message,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use time::macros::date;

    use super::*;

    fn raw_booking(status: &str) -> tray::RawBooking {
        tray::RawBooking {
            id: "b1".to_string(),
            consultant_id: "c1".to_string(),
            student_id: "s1".to_string(),
            service_id: "svc".to_string(),
            date: "2024-03-01".to_string(),
            time: "09:00 AM - 10:00 AM".to_string(),
            amount: 100.0,
            status: status.to_string(),
            payment_status: "paid".to_string(),
            created_at: Some("2024-02-20T10:15:00Z".to_string()),
        }
    }

    #[test]
    fn malformed_windows_are_skipped() {
        let raw = tray::RawAvailability {
            available: true,
            availability_windows: vec![
                tray::RawAvailabilityWindow {
                    date: "2024-03-01".to_string(),
                    start_time: "09:00 AM".to_string(),
                    end_time: "12:00 PM".to_string(),
                },
                tray::RawAvailabilityWindow {
                    date: "2024-03-01".to_string(),
                    start_time: "nine".to_string(),
                    end_time: "12:00 PM".to_string(),
                },
                tray::RawAvailabilityWindow {
                    date: "03/01/2024".to_string(),
                    start_time: "09:00 AM".to_string(),
                    end_time: "10:00 AM".to_string(),
                },
            ],
            ..Default::default()
        };

        let availability = to_domain_availability(raw);

        assert_eq!(availability.windows.len(), 1);
        assert_eq!(availability.windows[0].date, date!(2024 - 03 - 01));
        assert_eq!(availability.windows[0].length_minutes(), 180);
    }

    #[test]
    fn weekly_keys_map_to_weekdays() {
        let raw = tray::RawAvailability {
            available: true,
            availability: Some(HashMap::from([
                ("monday".to_string(), vec!["09:00 AM".to_string()]),
                ("Friday".to_string(), vec!["01:00 PM".to_string()]),
                ("someday".to_string(), vec!["02:00 PM".to_string()]),
            ])),
            ..Default::default()
        };

        let weekly = to_domain_availability(raw).weekly.unwrap();

        assert_eq!(weekly.slots_for(Weekday::Monday), Some(&["09:00 AM".to_string()][..]));
        assert!(weekly.slots_for(Weekday::Friday).is_some());
        assert!(weekly.slots_for(Weekday::Sunday).is_none());
    }

    #[test]
    fn dates_tolerate_timestamps() {
        assert_eq!(parse_date("2024-03-01T00:00:00.000Z").unwrap(), date!(2024 - 03 - 01));
        assert!(matches!(parse_date("tomorrow"), Err(BookingError::MalformedInput(_))));
    }

    #[test]
    fn booking_conversion_parses_status_and_timestamp() {
        let booking = to_domain_booking(raw_booking("Accepted")).unwrap();

        assert_eq!(booking.status, BookingStatus::Accepted);
        assert_eq!(booking.provider_id.as_str(), "c1");
        assert_eq!(booking.payment_status, "paid");
        assert!(booking.created_at.is_some());
    }

    #[test]
    fn unknown_status_is_skipped() {
        let bookings = to_domain_bookings(vec![raw_booking("rescheduled"), raw_booking("pending")]);

        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].status, BookingStatus::Pending);
    }

    #[test]
    fn booked_slots_keep_their_labels() {
        let raw = tray::RawBookedSlotsResponse {
            booked_slots: vec![
                tray::RawBookedSlot {
                    date: "2024-02-17".to_string(),
                    time: "09:00 AM".to_string(),
                    booking_id: Some("b1".to_string()),
                },
                tray::RawBookedSlot {
                    date: "bad".to_string(),
                    time: "10:00 AM".to_string(),
                    booking_id: None,
                },
            ],
            count: 2,
        };

        let booked = to_domain_booked_slots(raw);

        assert_eq!(booked.len(), 1);
        assert!(booked.contains(date!(2024 - 02 - 17), "09:00 AM - 10:00 AM"));
    }
}
