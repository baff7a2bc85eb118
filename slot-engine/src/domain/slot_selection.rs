use std::collections::HashSet;

use time::Date;

use crate::domain::{
    models::{SelectedSlot, SlotKey},
    TimeOfDay,
};

/// Slots a consumer has picked across dates before adding them to the cart.
#[derive(Debug, Clone, Default)]
pub struct SlotSelection {
    slots: Vec<SelectedSlot>,
    keys: HashSet<SlotKey>,
}

impl SlotSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given labels for `date`, returning how many were new.
    ///
    /// Labels that do not parse are skipped.
    pub fn add_for_date<'a>(
        &mut self,
        date: Date,
        labels: impl IntoIterator<Item = &'a str>,
        duration_minutes: u32,
    ) -> usize {
        let mut added = 0;
        for label in labels {
            let Some(slot) = SelectedSlot::from_label(date, label, duration_minutes) else {
                tracing::debug!(%date, label, "skipping unparseable slot label");
                continue;
            };
            if self.keys.insert(slot.key()) {
                self.slots.push(slot);
                added += 1;
            }
        }
        added
    }

    pub fn remove(&mut self, date: Date, start_time: TimeOfDay) -> bool {
        if !self.keys.remove(&SlotKey { date, start_time }) {
            return false;
        }
        self.slots
            .retain(|s| !(s.date == date && s.start_time == start_time));
        true
    }

    pub fn contains(&self, date: Date, start_time: TimeOfDay) -> bool {
        self.keys.contains(&SlotKey { date, start_time })
    }

    pub fn slots(&self) -> &[SelectedSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.keys.clear();
    }

    pub fn into_slots(self) -> Vec<SelectedSlot> {
        self.slots
    }
}
