use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBooking {
    pub id: String,
    pub consultant_id: String,
    pub student_id: String,
    pub service_id: String,
    pub date: String,
    pub time: String,
    pub amount: f64,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_payment_status")]
    pub payment_status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_status() -> String {
    "pending".to_string()
}

fn default_payment_status() -> String {
    "unpaid".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBookingsResponse {
    #[serde(default)]
    pub bookings: Vec<RawBooking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingPayload {
    pub consultant_id: String,
    pub service_id: String,
    pub date: String,
    pub time: String,
    pub amount: f64,
    pub quantity: u32,
}

impl CreateBookingPayload {
    pub fn new(
        consultant_id: String,
        service_id: String,
        date: String,
        time: String,
        amount: f64,
    ) -> Self {
        Self {
            consultant_id,
            service_id,
            date,
            time,
            amount,
            quantity: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub booking_id: String,
}
