use std::{path::Path, str::FromStr, time::Duration};

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

use crate::domain::services::BookingFlowSettings;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub scheduling: SchedulingSettings,
    pub cancellation: CancellationSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Root of the marketplace API, e.g. `http://localhost:8080/api`.
    pub base_url: String,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct SchedulingSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub default_session_minutes: u32,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub bookable_horizon_days: u32,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub bookable_date_limit: usize,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct CancellationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_attempts: u32,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub retry_backoff_ms: u64,
}

impl From<&Settings> for BookingFlowSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            default_session_minutes: settings.scheduling.default_session_minutes,
            bookable_horizon_days: settings.scheduling.bookable_horizon_days,
            bookable_date_limit: settings.scheduling.bookable_date_limit,
            max_attempts: settings.cancellation.max_attempts,
            retry_backoff: Duration::from_millis(settings.cancellation.retry_backoff_ms),
        }
    }
}

/// Reads `config/` under the working directory for the environment named by
/// `APP_ENVIRONMENT` (default `local`).
pub fn read_config() -> Result<Settings, config::ConfigError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
    })?;

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|e| config::ConfigError::Message(format!("Failed to parse APP_ENVIRONMENT: {e}")))?;

    read_config_from(&base_path.join("config"), &environment)
}

/// Layers `base.yaml`, `{environment}.yaml` and `SLOT_ENGINE_*` variables.
pub fn read_config_from(
    config_directory: &Path,
    environment: &Environment,
) -> Result<Settings, config::ConfigError> {
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("SLOT_ENGINE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
