//! Reconciles candidate slots against existing reservations and the
//! consumer's own picks.

use std::collections::{HashMap, HashSet};

use time::Date;

use crate::domain::{
    label_start, label_start_time,
    models::{CandidateSlot, SelectedSlot, SlotKey},
    TimeOfDay,
};

/// A reservation recorded against a provider.
///
/// `label` is the time string exactly as stored; older records hold only a
/// start time while newer ones hold a full range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookedSlotKey {
    pub date: Date,
    pub label: String,
    pub start: Option<TimeOfDay>,
}

impl BookedSlotKey {
    pub fn new(date: Date, label: impl Into<String>) -> Self {
        let label = label.into().trim().to_string();
        let start = label_start_time(&label);
        Self { date, label, start }
    }
}

/// Snapshot of a provider's reservations, indexed for membership tests.
#[derive(Debug, Clone, Default)]
pub struct BookedSlotSet {
    labels: HashSet<(Date, String)>,
    starts: HashSet<SlotKey>,
}

impl BookedSlotSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: BookedSlotKey) {
        if let Some(start_time) = key.start {
            self.starts.insert(SlotKey {
                date: key.date,
                start_time,
            });
        }
        self.labels.insert((key.date, key.label));
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether `label` on `date` is already reserved.
    ///
    /// Matches when the stored label equals the full label or its start
    /// portion, or when both normalize to the same start time. Stored labels
    /// that lack an end time therefore still block the full range.
    pub fn contains(&self, date: Date, label: &str) -> bool {
        let label = label.trim();
        if self.labels.contains(&(date, label.to_string())) {
            return true;
        }

        let start = label_start(label);
        if self.labels.contains(&(date, start.to_string())) {
            return true;
        }

        label_start_time(label).is_some_and(|start_time| {
            self.starts.contains(&SlotKey { date, start_time })
        })
    }
}

impl FromIterator<BookedSlotKey> for BookedSlotSet {
    fn from_iter<I: IntoIterator<Item = BookedSlotKey>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotStatus {
    /// Picked by this consumer earlier in the session.
    AlreadyAdded,
    /// Reserved by someone else.
    BookedByOthers,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSlot {
    pub slot: CandidateSlot,
    pub status: SlotStatus,
}

impl ClassifiedSlot {
    pub fn is_open(&self) -> bool {
        self.status == SlotStatus::Open
    }
}

/// Classifies every candidate exactly once.
///
/// A consumer's own pick wins over a reservation so that a slot they just
/// added is not shown as taken before the reservation list catches up.
pub fn classify_slots(
    candidates: &[CandidateSlot],
    booked: &BookedSlotSet,
    selected: &[SelectedSlot],
) -> Vec<ClassifiedSlot> {
    let selected_keys: HashSet<SlotKey> = selected.iter().map(SelectedSlot::key).collect();

    candidates
        .iter()
        .map(|candidate| {
            let already_added = candidate.start_time().is_some_and(|start_time| {
                selected_keys.contains(&SlotKey {
                    date: candidate.date,
                    start_time,
                })
            });

            let status = if already_added {
                SlotStatus::AlreadyAdded
            } else if booked.contains(candidate.date, &candidate.label) {
                SlotStatus::BookedByOthers
            } else {
                SlotStatus::Open
            };

            ClassifiedSlot {
                slot: candidate.clone(),
                status,
            }
        })
        .collect()
}

/// Per-status counts for a classified date view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotStateStats {
    pub total: usize,
    pub booked_by_others: usize,
    pub already_added: usize,
    pub open: usize,
}

impl SlotStateStats {
    pub fn from_classified(slots: &[ClassifiedSlot]) -> Self {
        let counts: HashMap<SlotStatus, usize> =
            slots.iter().fold(HashMap::new(), |mut acc, slot| {
                *acc.entry(slot.status).or_default() += 1;
                acc
            });
        let count = |status: SlotStatus| counts.get(&status).copied().unwrap_or(0);

        Self {
            total: slots.len(),
            booked_by_others: count(SlotStatus::BookedByOthers),
            already_added: count(SlotStatus::AlreadyAdded),
            open: count(SlotStatus::Open),
        }
    }

    pub fn all_booked(&self) -> bool {
        self.total > 0 && self.booked_by_others == self.total
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::parse_to_minutes;

    fn selected(date: Date, start: &str, end: &str) -> SelectedSlot {
        SelectedSlot::new(
            date,
            parse_to_minutes(start).unwrap(),
            parse_to_minutes(end).unwrap(),
        )
    }

    #[test]
    fn start_only_record_blocks_full_range() {
        let day = date!(2024 - 02 - 17);
        let booked: BookedSlotSet = [BookedSlotKey::new(day, "09:00 AM")].into_iter().collect();
        let candidates = [CandidateSlot::new(day, "09:00 AM - 10:00 AM")];

        let classified = classify_slots(&candidates, &booked, &[]);

        assert_eq!(classified[0].status, SlotStatus::BookedByOthers);
    }

    #[test]
    fn full_label_record_matches() {
        let day = date!(2024 - 02 - 17);
        let booked: BookedSlotSet = [BookedSlotKey::new(day, "10:00 AM - 11:00 AM")]
            .into_iter()
            .collect();

        assert!(booked.contains(day, "10:00 AM - 11:00 AM"));
        assert!(!booked.contains(day, "09:00 AM - 10:00 AM"));
        assert!(!booked.contains(date!(2024 - 02 - 18), "10:00 AM - 11:00 AM"));
    }

    #[test]
    fn separator_variants_match_by_normalized_start() {
        let day = date!(2024 - 02 - 17);
        let booked: BookedSlotSet = [BookedSlotKey::new(day, "9.00 AM")].into_iter().collect();

        assert!(booked.contains(day, "09:00 AM - 10:00 AM"));
    }

    #[test]
    fn unparseable_record_still_matches_verbatim() {
        let day = date!(2024 - 02 - 17);
        let booked: BookedSlotSet = [BookedSlotKey::new(day, "morning")].into_iter().collect();

        assert!(booked.contains(day, "morning"));
        assert!(!booked.contains(day, "09:00 AM"));
    }

    #[test]
    fn own_selection_takes_precedence_over_reservation() {
        let day = date!(2024 - 02 - 17);
        let booked: BookedSlotSet = [BookedSlotKey::new(day, "09:00 AM")].into_iter().collect();
        let candidates = [
            CandidateSlot::new(day, "09:00 AM - 10:00 AM"),
            CandidateSlot::new(day, "10:00 AM - 11:00 AM"),
        ];
        let mine = [selected(day, "09:00 AM", "10:00 AM")];

        let classified = classify_slots(&candidates, &booked, &mine);

        assert_eq!(classified[0].status, SlotStatus::AlreadyAdded);
        assert_eq!(classified[1].status, SlotStatus::Open);
    }

    #[test]
    fn selection_on_other_date_does_not_match() {
        let day = date!(2024 - 02 - 17);
        let candidates = [CandidateSlot::new(day, "09:00 AM - 10:00 AM")];
        let mine = [selected(date!(2024 - 02 - 18), "09:00 AM", "10:00 AM")];

        let classified = classify_slots(&candidates, &BookedSlotSet::new(), &mine);

        assert!(classified[0].is_open());
    }

    #[test]
    fn stats_count_each_status() {
        let day = date!(2024 - 02 - 17);
        let booked: BookedSlotSet = [BookedSlotKey::new(day, "10:00 AM - 11:00 AM")]
            .into_iter()
            .collect();
        let candidates = [
            CandidateSlot::new(day, "09:00 AM - 10:00 AM"),
            CandidateSlot::new(day, "10:00 AM - 11:00 AM"),
            CandidateSlot::new(day, "11:00 AM - 12:00 PM"),
        ];
        let mine = [selected(day, "11:00 AM", "12:00 PM")];

        let stats = SlotStateStats::from_classified(&classify_slots(&candidates, &booked, &mine));

        assert_eq!(
            stats,
            SlotStateStats {
                total: 3,
                booked_by_others: 1,
                already_added: 1,
                open: 1,
            }
        );
        assert!(!stats.all_booked());
    }
}
