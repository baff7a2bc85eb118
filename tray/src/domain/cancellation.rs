use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// The refund fields are optional: older deployments answer with a message only.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingResponse {
    #[serde(default)]
    pub refund_amount: Option<f64>,
    #[serde(default)]
    pub refund_percentage: Option<u8>,
    #[serde(default)]
    pub message: Option<String>,
}
