use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Availability document as published by a consultant profile.
///
/// Three generations of the format coexist in the wild, so every field is
/// optional and defaults to empty.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAvailability {
    #[serde(default)]
    pub available: bool,
    /// Legacy weekly pattern keyed by lowercase weekday name.
    #[serde(default)]
    pub availability: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub availability_slots: Vec<RawDatedSlots>,
    #[serde(default)]
    pub availability_windows: Vec<RawAvailabilityWindow>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RawAvailability {
    /// The normalized "nothing published" response used when the profile has
    /// no availability document at all.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDatedSlots {
    pub date: String,
    #[serde(default)]
    pub time_slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAvailabilityWindow {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}
