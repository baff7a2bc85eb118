//! Turns published availability into the candidate slots for a date.

use itertools::Itertools;
use time::{Date, Duration};

use crate::domain::{
    models::{AvailabilitySource, AvailabilityWindow, CandidateSlot, ProviderAvailability},
    TimeOfDay,
};

/// Session length used when a service does not specify one.
pub const DEFAULT_SESSION_MINUTES: u32 = 60;

/// Resolves the ordered, de-duplicated candidate slots for `date`.
///
/// Windows on that date are sliced into `duration_minutes`-wide ranges and
/// are authoritative when present. Otherwise the labels published for that
/// date are used, and failing that the weekly pattern for its weekday. A
/// duration of zero falls back to [`DEFAULT_SESSION_MINUTES`].
pub fn resolve_slots_for_date(
    date: Date,
    availability: &ProviderAvailability,
    duration_minutes: u32,
) -> Vec<CandidateSlot> {
    let duration = effective_duration(duration_minutes);

    let labels: Vec<String> = match availability.source_for(date) {
        AvailabilitySource::Windows(mut windows) => {
            windows.sort_by_key(|w| w.start_time);
            windows
                .into_iter()
                .flat_map(|w| slice_window(w, duration))
                .unique()
                .collect()
        }
        AvailabilitySource::DatedSlots(labels) | AvailabilitySource::Weekly(labels) => labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .unique()
            .map(str::to_string)
            .collect(),
        AvailabilitySource::Unavailable => Vec::new(),
    };

    tracing::debug!(%date, duration, slots = labels.len(), "resolved slots");

    labels
        .into_iter()
        .map(|label| CandidateSlot::new(date, label))
        .collect()
}

/// Whether at least one slot can be booked on `date`.
pub fn is_date_available(
    date: Date,
    availability: &ProviderAvailability,
    duration_minutes: u32,
) -> bool {
    !resolve_slots_for_date(date, availability, duration_minutes).is_empty()
}

/// Dates a consumer can pick from, earliest first.
///
/// Combines every specific date from `today` on that has at least one slot
/// with the weekly pattern projected over `horizon_days` starting at `today`,
/// capped at `limit` dates.
pub fn bookable_dates(
    availability: &ProviderAvailability,
    today: Date,
    duration_minutes: u32,
    horizon_days: u32,
    limit: usize,
) -> Vec<Date> {
    let specific = availability
        .windows
        .iter()
        .map(|w| w.date)
        .chain(availability.dated_slots.iter().map(|d| d.date));

    let projected: Vec<Date> = match availability.weekly {
        Some(_) => (0..horizon_days)
            .filter_map(|offset| today.checked_add(Duration::days(i64::from(offset))))
            .collect(),
        None => Vec::new(),
    };

    specific
        .chain(projected)
        .filter(|date| *date >= today)
        .sorted()
        .dedup()
        .filter(|date| is_date_available(*date, availability, duration_minutes))
        .take(limit)
        .collect()
}

fn effective_duration(duration_minutes: u32) -> u32 {
    if duration_minutes == 0 {
        DEFAULT_SESSION_MINUTES
    } else {
        duration_minutes
    }
}

/// Consecutive full-length slices of a window; a trailing remainder shorter
/// than the duration is dropped.
fn slice_window(window: &AvailabilityWindow, duration: u32) -> Vec<String> {
    if !window.is_well_formed() {
        tracing::debug!(
            date = %window.date,
            start = %window.start_time,
            end = %window.end_time,
            "skipping window that does not end after it starts"
        );
        return Vec::new();
    }

    let end = u32::from(window.end_time.minutes());
    let mut cursor = u32::from(window.start_time.minutes());
    let mut labels = Vec::new();
    while let Some(next) = cursor.checked_add(duration).filter(|next| *next <= end) {
        let start = TimeOfDay::from_minutes(i64::from(cursor));
        let finish = TimeOfDay::from_minutes(i64::from(next));
        labels.push(format!("{} - {}", start, finish));
        cursor = next;
    }
    labels
}

#[cfg(test)]
mod tests {
    use time::{macros::date, Weekday};

    use super::*;
    use crate::domain::{
        models::{DatedSlotList, LegacyWeeklyAvailability},
        parse_to_minutes,
    };

    fn window(date: Date, start: &str, end: &str) -> AvailabilityWindow {
        AvailabilityWindow::new(
            date,
            parse_to_minutes(start).unwrap(),
            parse_to_minutes(end).unwrap(),
        )
    }

    fn labels(slots: &[CandidateSlot]) -> Vec<&str> {
        slots.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn slices_window_into_full_slots() {
        let day = date!(2024 - 02 - 17);
        let availability =
            ProviderAvailability::new().with_window(window(day, "09:00 AM", "11:00 AM"));

        let hourly = resolve_slots_for_date(day, &availability, 60);
        assert_eq!(labels(&hourly), ["09:00 AM - 10:00 AM", "10:00 AM - 11:00 AM"]);

        let ninety = resolve_slots_for_date(day, &availability, 90);
        assert_eq!(labels(&ninety), ["09:00 AM - 10:30 AM"]);
    }

    #[test]
    fn duration_wider_than_window_yields_nothing() {
        let day = date!(2024 - 02 - 17);
        let availability =
            ProviderAvailability::new().with_window(window(day, "09:00 AM", "10:00 AM"));

        assert!(resolve_slots_for_date(day, &availability, 120).is_empty());
    }

    #[test]
    fn huge_duration_yields_nothing() {
        let day = date!(2024 - 02 - 17);
        let availability =
            ProviderAvailability::new().with_window(window(day, "09:00 AM", "11:00 AM"));

        assert!(resolve_slots_for_date(day, &availability, u32::MAX).is_empty());
        assert!(!is_date_available(day, &availability, u32::MAX));
        assert!(bookable_dates(&availability, day, u32::MAX, 7, 20).is_empty());
    }

    #[test]
    fn zero_duration_uses_default() {
        let day = date!(2024 - 02 - 17);
        let availability =
            ProviderAvailability::new().with_window(window(day, "09:00 AM", "11:00 AM"));

        assert_eq!(resolve_slots_for_date(day, &availability, 0).len(), 2);
    }

    #[test]
    fn multiple_windows_are_ordered_and_deduplicated() {
        let day = date!(2024 - 02 - 17);
        let availability = ProviderAvailability::new()
            .with_window(window(day, "02:00 PM", "03:00 PM"))
            .with_window(window(day, "09:00 AM", "10:00 AM"))
            .with_window(window(day, "09:00 AM", "10:00 AM"))
            .with_window(window(date!(2024 - 02 - 18), "09:00 AM", "10:00 AM"));

        let slots = resolve_slots_for_date(day, &availability, 60);
        assert_eq!(labels(&slots), ["09:00 AM - 10:00 AM", "02:00 PM - 03:00 PM"]);
        assert!(slots.iter().all(|s| s.date == day));
    }

    #[test]
    fn inverted_window_is_skipped_without_losing_others() {
        let day = date!(2024 - 02 - 17);
        let availability = ProviderAvailability::new()
            .with_window(window(day, "11:00 AM", "09:00 AM"))
            .with_window(window(day, "01:00 PM", "02:00 PM"));

        let slots = resolve_slots_for_date(day, &availability, 60);
        assert_eq!(labels(&slots), ["01:00 PM - 02:00 PM"]);
    }

    #[test]
    fn window_data_wins_over_legacy() {
        let day = date!(2024 - 02 - 17);
        let availability = ProviderAvailability::new()
            .with_window(window(day, "09:00 AM", "10:00 AM"))
            .with_weekly(LegacyWeeklyAvailability::new().with_day(
                Weekday::Saturday,
                vec!["03:00 PM".into(), "04:00 PM".into()],
            ));

        let slots = resolve_slots_for_date(day, &availability, 60);
        assert_eq!(labels(&slots), ["09:00 AM - 10:00 AM"]);
    }

    #[test]
    fn legacy_labels_are_returned_verbatim() {
        let saturday = date!(2024 - 02 - 17);
        let availability = ProviderAvailability::new().with_weekly(
            LegacyWeeklyAvailability::new().with_day(
                Weekday::Saturday,
                vec!["10:00 AM".into(), "09:00 AM".into(), "10:00 AM".into()],
            ),
        );

        let slots = resolve_slots_for_date(saturday, &availability, 30);
        assert_eq!(labels(&slots), ["10:00 AM", "09:00 AM"]);
        assert!(resolve_slots_for_date(date!(2024 - 02 - 19), &availability, 30).is_empty());
    }

    #[test]
    fn dated_labels_are_used_without_windows() {
        let day = date!(2024 - 03 - 01);
        let availability = ProviderAvailability::new()
            .with_dated_slots(DatedSlotList::new(day, vec!["01:00 PM".into(), "02:00 PM".into()]));

        let slots = resolve_slots_for_date(day, &availability, 60);
        assert_eq!(labels(&slots), ["01:00 PM", "02:00 PM"]);
    }

    #[test]
    fn bookable_dates_merge_sources_sorted_and_limited() {
        let today = date!(2024 - 03 - 01); // a Friday
        let availability = ProviderAvailability::new()
            .with_window(window(date!(2024 - 03 - 05), "09:00 AM", "10:00 AM"))
            .with_window(window(date!(2024 - 03 - 02), "09:00 AM", "09:30 AM"))
            .with_dated_slots(DatedSlotList::new(date!(2024 - 03 - 03), vec!["01:00 PM".into()]))
            .with_weekly(
                LegacyWeeklyAvailability::new().with_day(Weekday::Monday, vec!["09:00 AM".into()]),
            );

        let dates = bookable_dates(&availability, today, 60, 14, 20);
        assert_eq!(
            dates,
            vec![
                date!(2024 - 03 - 03),
                date!(2024 - 03 - 04),
                date!(2024 - 03 - 05),
                date!(2024 - 03 - 11),
            ]
        );

        let limited = bookable_dates(&availability, today, 60, 14, 2);
        assert_eq!(limited, vec![date!(2024 - 03 - 03), date!(2024 - 03 - 04)]);
    }

    #[test]
    fn unavailable_date() {
        let availability = ProviderAvailability::new();
        assert!(!is_date_available(date!(2024 - 03 - 01), &availability, 60));
    }
}
