use reqwest::{header::AUTHORIZATION, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::{
        CancelBookingPayload, CancelBookingResponse, CreateBookingPayload, CreateBookingResponse,
        RawAvailability, RawBookedSlotsResponse, RawBooking, RawBookingsResponse,
    },
    TrayURL,
};

use super::Credentials;

pub struct TrayClient {
    base_url: TrayURL,
    credentials: Credentials,
    http: reqwest::Client,
}

impl TrayClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, TrayFetchError> {
        let base_url = TrayURL::parse(base_url)
            .map_err(|e| TrayFetchError::Other(format!("Invalid base URL {base_url:?}: {}", e)))?;
        Ok(Self {
            base_url,
            credentials,
            http: reqwest::Client::new(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.credentials.user_id
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: impl AsRef<str>,
        body: Option<&B>,
    ) -> Result<T, TrayFetchError> {
        let auth_header = self
            .credentials
            .as_authorization_header()
            .map_err(|e| TrayFetchError::Other(format!("Invalid credentials: {}", e)))?;

        let mut request = self
            .http
            .request(method.clone(), url.as_ref())
            .header(AUTHORIZATION, auth_header);
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, url = url.as_ref(), "sending request");

        let resp = request
            .send()
            .await
            .map_err(|e| TrayFetchError::ResponseError(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or_else(|| status.to_string());
            return Err(TrayFetchError::from_status(status, message));
        }

        resp.json::<T>().await.map_err(|e| {
            TrayFetchError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: impl AsRef<str>) -> Result<T, TrayFetchError> {
        self.send::<(), T>(Method::GET, url, None).await
    }

    /// Fetches the published availability of a consultant. A profile without
    /// an availability document is reported as empty availability rather than
    /// an error.
    pub async fn fetch_availability(
        &self,
        consultant_id: &str,
    ) -> Result<RawAvailability, TrayFetchError> {
        let url = self
            .base_url
            .append_path("/consultant-flow/profiles")
            .append_segment(consultant_id)
            .append_path("availability");

        match self.fetch(url).await {
            Err(TrayFetchError::NotFound) => Ok(RawAvailability::empty()),
            other => other,
        }
    }

    /// Fetches the active (pending, accepted, confirmed) reservations held
    /// against a consultant.
    pub async fn fetch_booked_slots(
        &self,
        consultant_id: &str,
    ) -> Result<RawBookedSlotsResponse, TrayFetchError> {
        let url = self
            .base_url
            .append_path("/bookings/consultant")
            .append_segment(consultant_id)
            .append_path("booked-slots");

        self.fetch(url).await
    }

    pub async fn fetch_student_bookings(
        &self,
        student_id: &str,
    ) -> Result<Vec<RawBooking>, TrayFetchError> {
        let url = self
            .base_url
            .append_path("/bookings/student")
            .append_segment(student_id);

        let response: RawBookingsResponse = self.fetch(url).await?;
        Ok(response.bookings)
    }

    pub async fn create_booking(
        &self,
        payload: &CreateBookingPayload,
    ) -> Result<CreateBookingResponse, TrayFetchError> {
        let url = self.base_url.append_path("/bookings");
        self.send(Method::POST, url, Some(payload)).await
    }

    pub async fn cancel_booking(
        &self,
        booking_id: &str,
        payload: &CancelBookingPayload,
    ) -> Result<CancelBookingResponse, TrayFetchError> {
        let url = self
            .base_url
            .append_path("/bookings")
            .append_segment(booking_id)
            .append_path("cancel");
        self.send(Method::PUT, url, Some(payload)).await
    }
}

#[derive(Error, Debug)]
pub enum TrayFetchError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("NotFound")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("ServerError ({status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Other: {0}")]
    Other(String),
}

impl TrayFetchError {
    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict(message),
            s if s.is_server_error() => Self::ServerError {
                status: s.as_u16(),
                message,
            },
            s => Self::Other(format!("{}: {}", s, message)),
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServerError { .. } | Self::ResponseError(_))
    }
}

/// Error payload returned by the API alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}
