//! Folds slot selections into per provider/service cart lines.
//!
//! The cart is a plain value. Operations take it by value and hand back the
//! updated cart together with what happened, so the caller owns persistence.

use std::collections::HashSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;

use crate::domain::{
    models::{CartLineId, ProviderAvailability, ProviderId, SelectedSlot, ServiceId, SlotKey},
    resolve_slots_for_date, BookedSlotSet, TimeOfDay,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub provider_id: ProviderId,
    pub service_id: ServiceId,
    pub provider_name: String,
    pub service_name: String,
    pub price_per_slot: f64,
    pub booked_slots: Vec<SelectedSlot>,
    pub counter: usize,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl CartLine {
    fn from_selection(selection: NewCartSelection, slots: Vec<SelectedSlot>) -> Self {
        let mut line = Self {
            id: CartLineId::for_pair(&selection.provider_id, &selection.service_id),
            provider_id: selection.provider_id,
            service_id: selection.service_id,
            provider_name: selection.provider_name,
            service_name: selection.service_name,
            price_per_slot: selection.price_per_slot,
            booked_slots: slots,
            counter: 0,
            total_price: 0.0,
            duration_minutes: selection.duration_minutes,
        };
        line.recompute();
        line
    }

    fn matches(&self, provider_id: &ProviderId, service_id: &ServiceId) -> bool {
        &self.provider_id == provider_id && &self.service_id == service_id
    }

    fn keys(&self) -> HashSet<SlotKey> {
        self.booked_slots.iter().map(SelectedSlot::key).collect()
    }

    fn recompute(&mut self) {
        self.counter = self.booked_slots.len();
        self.total_price = self.counter as f64 * self.price_per_slot;
        debug_assert!(self.is_consistent());
    }

    /// Whether the derived fields agree with the slots and no slot repeats.
    pub fn is_consistent(&self) -> bool {
        self.counter == self.booked_slots.len()
            && self.total_price == self.counter as f64 * self.price_per_slot
            && self.keys().len() == self.booked_slots.len()
    }

    /// Dates with at least one slot, in the order they were first added.
    pub fn dates(&self) -> Vec<Date> {
        self.booked_slots.iter().map(|s| s.date).unique().collect()
    }
}

/// Slots picked for one provider/service pair, with the line metadata used
/// if a new line has to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartSelection {
    pub provider_id: ProviderId,
    pub service_id: ServiceId,
    pub provider_name: String,
    pub service_name: String,
    pub price_per_slot: f64,
    pub duration_minutes: Option<u32>,
    pub slots: Vec<SelectedSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddSlotsOutcome {
    Created,
    Merged { added: usize, skipped: usize },
    /// Every requested slot was already in the line; nothing changed.
    AllDuplicates,
    NoSlots,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveSlotOutcome {
    SlotRemoved { remaining: usize },
    /// The last slot was removed, taking the line with it.
    LineRemoved,
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartUpdate<O> {
    pub cart: Cart,
    pub outcome: O,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("cart line not found: {0}")]
    LineNotFound(CartLineId),
    #[error("a cart line must keep at least one slot")]
    MinimumReached,
    #[error("no more open slots on the dates in this line")]
    NoMoreSlots,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, line_id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == line_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.lines.iter().map(|l| l.counter).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(|l| l.total_price).sum()
    }

    pub fn clear(self) -> Cart {
        Cart::new()
    }

    /// Adds slots to the line for the selection's provider/service pair,
    /// creating it if needed. Slots whose date and start time are already in
    /// the line are skipped; an existing line keeps its price and names.
    pub fn add_slots(mut self, selection: NewCartSelection) -> CartUpdate<AddSlotsOutcome> {
        if selection.slots.is_empty() {
            return self.unchanged(AddSlotsOutcome::NoSlots);
        }

        let requested = selection.slots.len();
        let existing = self
            .lines
            .iter_mut()
            .find(|l| l.matches(&selection.provider_id, &selection.service_id));

        let outcome = match existing {
            Some(line) => {
                let mut seen = line.keys();
                let fresh: Vec<SelectedSlot> = selection
                    .slots
                    .into_iter()
                    .filter(|s| seen.insert(s.key()))
                    .collect();

                if fresh.is_empty() {
                    tracing::debug!(line = %line.id, "all requested slots already in cart");
                    AddSlotsOutcome::AllDuplicates
                } else {
                    let added = fresh.len();
                    line.booked_slots.extend(fresh);
                    line.recompute();
                    AddSlotsOutcome::Merged {
                        added,
                        skipped: requested - added,
                    }
                }
            }
            None => {
                let mut seen = HashSet::new();
                let slots: Vec<SelectedSlot> = selection
                    .slots
                    .iter()
                    .filter(|s| seen.insert(s.key()))
                    .cloned()
                    .collect();
                self.lines.push(CartLine::from_selection(selection, slots));
                AddSlotsOutcome::Created
            }
        };

        CartUpdate {
            cart: self,
            outcome,
        }
    }

    /// Removes one slot from a line. Removing the last slot removes the line.
    pub fn remove_slot(
        mut self,
        line_id: &CartLineId,
        date: Date,
        start_time: TimeOfDay,
    ) -> CartUpdate<RemoveSlotOutcome> {
        let Some(index) = self.lines.iter().position(|l| &l.id == line_id) else {
            return self.unchanged(RemoveSlotOutcome::NotFound);
        };

        let line = &mut self.lines[index];
        let before = line.booked_slots.len();
        line.booked_slots
            .retain(|s| !(s.date == date && s.start_time == start_time));
        if line.booked_slots.len() == before {
            return self.unchanged(RemoveSlotOutcome::NotFound);
        }

        let outcome = if line.booked_slots.is_empty() {
            self.lines.remove(index);
            RemoveSlotOutcome::LineRemoved
        } else {
            line.recompute();
            RemoveSlotOutcome::SlotRemoved {
                remaining: line.counter,
            }
        };

        CartUpdate {
            cart: self,
            outcome,
        }
    }

    /// Removes a whole line. The outcome tells whether it existed.
    pub fn remove_line(mut self, line_id: &CartLineId) -> CartUpdate<bool> {
        let before = self.lines.len();
        self.lines.retain(|l| &l.id != line_id);
        let removed = self.lines.len() != before;
        CartUpdate {
            cart: self,
            outcome: removed,
        }
    }

    /// Drops the most recently added slot of a line, which must keep at
    /// least one.
    pub fn decrement_line(&mut self, line_id: &CartLineId) -> Result<SelectedSlot, CartError> {
        let line = self.line_mut(line_id)?;
        if line.booked_slots.len() <= 1 {
            return Err(CartError::MinimumReached);
        }

        let removed = line.booked_slots.pop().ok_or(CartError::MinimumReached)?;
        line.recompute();
        Ok(removed)
    }

    /// Adds the next open slot on a date the line already covers.
    ///
    /// Dates are tried in the order they were first added and slots in
    /// availability order. A slot qualifies when it is neither in the line
    /// nor booked by someone else.
    pub fn increment_line(
        &mut self,
        line_id: &CartLineId,
        availability: &ProviderAvailability,
        booked: &BookedSlotSet,
        default_duration_minutes: u32,
    ) -> Result<SelectedSlot, CartError> {
        let line = self.line_mut(line_id)?;
        let duration = line.duration_minutes.unwrap_or(default_duration_minutes);
        let taken = line.keys();

        let next = line
            .dates()
            .into_iter()
            .flat_map(|date| resolve_slots_for_date(date, availability, duration))
            .filter(|candidate| !booked.contains(candidate.date, &candidate.label))
            .filter_map(|candidate| SelectedSlot::from_candidate(&candidate, duration))
            .find(|slot| !taken.contains(&slot.key()))
            .ok_or(CartError::NoMoreSlots)?;

        line.booked_slots.push(next.clone());
        line.recompute();
        Ok(next)
    }

    fn line_mut(&mut self, line_id: &CartLineId) -> Result<&mut CartLine, CartError> {
        self.lines
            .iter_mut()
            .find(|l| &l.id == line_id)
            .ok_or_else(|| CartError::LineNotFound(line_id.clone()))
    }

    fn unchanged<O>(self, outcome: O) -> CartUpdate<O> {
        CartUpdate {
            cart: self,
            outcome,
        }
    }
}
