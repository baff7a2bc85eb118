use std::collections::HashMap;

use time::{Date, Weekday};

use crate::domain::TimeOfDay;

/// A provider-declared open interval on one calendar date.
///
/// `end_time > start_time` is expected but not enforced: provider data
/// sometimes contains inverted windows, and those simply yield no slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub date: Date,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl AvailabilityWindow {
    pub fn new(date: Date, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            date,
            start_time,
            end_time,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.end_time > self.start_time
    }

    pub fn length_minutes(&self) -> u16 {
        self.end_time.minutes().saturating_sub(self.start_time.minutes())
    }
}

/// Pre-labeled slots published for one specific date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedSlotList {
    pub date: Date,
    pub time_slots: Vec<String>,
}

impl DatedSlotList {
    pub fn new(date: Date, time_slots: Vec<String>) -> Self {
        Self { date, time_slots }
    }
}

/// Deprecated weekly pattern: the same labeled slots repeat every week.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyWeeklyAvailability {
    days: HashMap<Weekday, Vec<String>>,
}

impl LegacyWeeklyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, weekday: Weekday, slots: Vec<String>) -> Self {
        self.days.insert(weekday, slots);
        self
    }

    pub fn insert(&mut self, weekday: Weekday, slots: Vec<String>) {
        self.days.insert(weekday, slots);
    }

    pub fn slots_for(&self, weekday: Weekday) -> Option<&[String]> {
        self.days.get(&weekday).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }
}

/// Everything a provider has published, in all supported formats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderAvailability {
    pub windows: Vec<AvailabilityWindow>,
    pub dated_slots: Vec<DatedSlotList>,
    pub weekly: Option<LegacyWeeklyAvailability>,
}

/// The single source that governs a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilitySource<'a> {
    /// Time windows to be sliced at the session duration.
    Windows(Vec<&'a AvailabilityWindow>),
    /// Labels published for this exact date.
    DatedSlots(&'a [String]),
    /// Labels from the recurring weekly pattern.
    Weekly(&'a [String]),
    Unavailable,
}

impl ProviderAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window: AvailabilityWindow) -> Self {
        self.windows.push(window);
        self
    }

    pub fn with_dated_slots(mut self, dated: DatedSlotList) -> Self {
        self.dated_slots.push(dated);
        self
    }

    pub fn with_weekly(mut self, weekly: LegacyWeeklyAvailability) -> Self {
        self.weekly = Some(weekly);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
            && self.dated_slots.iter().all(|d| d.time_slots.is_empty())
            && self.weekly.as_ref().map_or(true, LegacyWeeklyAvailability::is_empty)
    }

    /// Picks the source for `date`: windows, then dated labels, then the
    /// weekly pattern. Sources are never merged.
    pub fn source_for(&self, date: Date) -> AvailabilitySource<'_> {
        let windows: Vec<&AvailabilityWindow> =
            self.windows.iter().filter(|w| w.date == date).collect();
        if !windows.is_empty() {
            return AvailabilitySource::Windows(windows);
        }

        if let Some(dated) = self
            .dated_slots
            .iter()
            .find(|d| d.date == date && !d.time_slots.is_empty())
        {
            return AvailabilitySource::DatedSlots(&dated.time_slots);
        }

        match self.weekly.as_ref().and_then(|w| w.slots_for(date.weekday())) {
            Some(slots) if !slots.is_empty() => AvailabilitySource::Weekly(slots),
            _ => AvailabilitySource::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::parse_to_minutes;

    fn t(s: &str) -> TimeOfDay {
        parse_to_minutes(s).unwrap()
    }

    #[test]
    fn windows_take_precedence_over_other_sources() {
        let day = date!(2024 - 02 - 17);
        let availability = ProviderAvailability::new()
            .with_window(AvailabilityWindow::new(day, t("09:00 AM"), t("11:00 AM")))
            .with_dated_slots(DatedSlotList::new(day, vec!["01:00 PM".into()]))
            .with_weekly(
                LegacyWeeklyAvailability::new().with_day(Weekday::Saturday, vec!["02:00 PM".into()]),
            );

        assert!(matches!(availability.source_for(day), AvailabilitySource::Windows(w) if w.len() == 1));
    }

    #[test]
    fn dated_slots_precede_weekly_pattern() {
        let day = date!(2024 - 02 - 17);
        let availability = ProviderAvailability::new()
            .with_dated_slots(DatedSlotList::new(day, vec!["01:00 PM".into()]))
            .with_weekly(
                LegacyWeeklyAvailability::new().with_day(Weekday::Saturday, vec!["02:00 PM".into()]),
            );

        assert_eq!(
            availability.source_for(day),
            AvailabilitySource::DatedSlots(&["01:00 PM".to_string()])
        );
    }

    #[test]
    fn weekly_pattern_is_fallback() {
        let saturday = date!(2024 - 02 - 17);
        let sunday = date!(2024 - 02 - 18);
        let availability = ProviderAvailability::new().with_weekly(
            LegacyWeeklyAvailability::new().with_day(Weekday::Saturday, vec!["02:00 PM".into()]),
        );

        assert_eq!(
            availability.source_for(saturday),
            AvailabilitySource::Weekly(&["02:00 PM".to_string()])
        );
        assert_eq!(availability.source_for(sunday), AvailabilitySource::Unavailable);
    }

    #[test]
    fn empty_availability() {
        assert!(ProviderAvailability::new().is_empty());
        let weekly_only_empty = ProviderAvailability::new()
            .with_weekly(LegacyWeeklyAvailability::new().with_day(Weekday::Monday, vec![]));
        assert!(weekly_only_empty.is_empty());
    }
}
