use std::env;

use reqwest::header::{HeaderValue, InvalidHeaderValue};
use thiserror::Error;

/// Bearer credentials issued by the identity provider. Obtaining them is
/// outside this crate; the client only attaches them to requests.
#[derive(Clone)]
pub struct Credentials {
    pub user_id: String,
    token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Error, Debug)]
pub enum IntoCredentialsError {
    #[error("Missing API token")]
    MissingToken,
    #[error("Missing user id")]
    MissingUserId,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }

    /// Reads `TRAY_USER_ID` and `TRAY_API_TOKEN` from the environment.
    pub fn from_env() -> Result<Self, IntoCredentialsError> {
        let token = env::var("TRAY_API_TOKEN").map_err(|_| IntoCredentialsError::MissingToken)?;
        let user_id = env::var("TRAY_USER_ID").map_err(|_| IntoCredentialsError::MissingUserId)?;
        Ok(Self::new(user_id, token))
    }

    pub fn as_authorization_header(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token))?;
        value.set_sensitive(true);
        Ok(value)
    }
}
