use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBookedSlotsResponse {
    #[serde(default)]
    pub booked_slots: Vec<RawBookedSlot>,
    #[serde(default)]
    pub count: usize,
}

/// A reservation held against a consultant. `time` is whatever label the
/// booking was created with: a bare start time on older records, a range on
/// newer ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBookedSlot {
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub booking_id: Option<String>,
}
