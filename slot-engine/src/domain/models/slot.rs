use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::{label_start_time, parse_to_minutes, split_label, TimeOfDay};

/// A bookable slot offered for one date, before any reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateSlot {
    pub date: Date,
    /// Either a start time or a `"start - end"` range.
    pub label: String,
}

impl CandidateSlot {
    pub fn new(date: Date, label: impl Into<String>) -> Self {
        Self {
            date,
            label: label.into(),
        }
    }

    pub fn start_time(&self) -> Option<TimeOfDay> {
        label_start_time(&self.label)
    }
}

/// Identity of a slot: two slots are the same when these match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub date: Date,
    pub start_time: TimeOfDay,
}

/// A slot the consumer has picked but not yet checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSlot {
    pub date: Date,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub display_start_time: String,
    pub display_end_time: String,
}

impl SelectedSlot {
    pub fn new(date: Date, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            date,
            start_time,
            end_time,
            display_start_time: start_time.to_string(),
            display_end_time: end_time.to_string(),
        }
    }

    /// Builds a selection from a slot label. The end time comes from the label
    /// when it has one, otherwise it is `duration_minutes` after the start.
    /// The display strings keep the label's own spelling.
    pub fn from_label(date: Date, label: &str, duration_minutes: u32) -> Option<Self> {
        let (start_display, end_display) = split_label(label);
        let start_time = parse_to_minutes(start_display)?;

        let (end_time, display_end_time) = match end_display.and_then(|e| {
            parse_to_minutes(e).map(|t| (t, e.to_string()))
        }) {
            Some(end) => end,
            None => {
                let end = start_time.add_minutes(i64::from(duration_minutes));
                (end, end.to_string())
            }
        };

        Some(Self {
            date,
            start_time,
            end_time,
            display_start_time: start_display.to_string(),
            display_end_time,
        })
    }

    pub fn from_candidate(candidate: &CandidateSlot, duration_minutes: u32) -> Option<Self> {
        Self::from_label(candidate.date, &candidate.label, duration_minutes)
    }

    pub fn key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            start_time: self.start_time,
        }
    }

    /// The label this slot is booked under.
    pub fn label(&self) -> String {
        format!("{} - {}", self.display_start_time, self.display_end_time)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn from_label_uses_range_end() {
        let slot = SelectedSlot::from_label(date!(2024 - 03 - 01), "09:00 AM - 10:30 AM", 60).unwrap();
        assert_eq!(slot.start_time.minutes(), 540);
        assert_eq!(slot.end_time.minutes(), 630);
        assert_eq!(slot.display_end_time, "10:30 AM");
    }

    #[test]
    fn from_label_derives_missing_end() {
        let slot = SelectedSlot::from_label(date!(2024 - 03 - 01), "9.00 AM", 45).unwrap();
        assert_eq!(slot.display_start_time, "9.00 AM");
        assert_eq!(slot.display_end_time, "09:45 AM");
        assert_eq!(slot.label(), "9.00 AM - 09:45 AM");
    }

    #[test]
    fn from_label_rejects_unparseable_start() {
        assert!(SelectedSlot::from_label(date!(2024 - 03 - 01), "morning", 60).is_none());
    }

    #[test]
    fn serializes_with_iso_date() {
        let slot = SelectedSlot::new(
            date!(2024 - 03 - 01),
            parse_to_minutes("09:00 AM").unwrap(),
            parse_to_minutes("10:00 AM").unwrap(),
        );
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["startTime"], 540);
        assert_eq!(json["displayEndTime"], "10:00 AM");

        let back: SelectedSlot = serde_json::from_value(json).unwrap();
        assert_eq!(back, slot);
    }
}
