//! Settings loader: `.env` file plus process environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{GOOEY_API_BASE, OPENWEATHER_API_BASE, POWER_API_BASE};
use crate::error::{Error, Result};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Bearer token for the Gooey AI endpoint. Checked when an AI-bot action runs.
    pub gooey_api_key: Option<String>,
    /// OpenWeatherMap application id. Checked when the weather action runs.
    pub openweather_api_key: Option<String>,
    /// Root under which `data_v2/` and `weather_data/` live
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    pub power_api_base: String,
    pub openweather_api_base: String,
    pub gooey_api_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gooey_api_key: None,
            openweather_api_key: None,
            data_dir: PathBuf::from("./"),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            power_api_base: POWER_API_BASE.to_string(),
            openweather_api_base: OPENWEATHER_API_BASE.to_string(),
            gooey_api_base: GOOEY_API_BASE.to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env` if present, then reads the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        settings.gooey_api_key = get("GOOEY_API_KEY");
        settings.openweather_api_key = get("OPENWEATHER_API_KEY");

        if let Some(dir) = get("AGRIBOT_DATA_DIR") {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get("AGRIBOT_HTTP_TIMEOUT_SECS") {
            settings.http_timeout = Duration::from_secs(parse_secs(&raw, "AGRIBOT_HTTP_TIMEOUT_SECS")?);
        }
        if let Some(base) = get("AGRIBOT_POWER_API_BASE") {
            settings.power_api_base = base;
        }
        if let Some(base) = get("AGRIBOT_OPENWEATHER_API_BASE") {
            settings.openweather_api_base = base;
        }
        if let Some(base) = get("AGRIBOT_GOOEY_API_BASE") {
            settings.gooey_api_base = base;
        }

        Ok(settings)
    }

    pub fn require_gooey_api_key(&self) -> Result<&str> {
        self.gooey_api_key.as_deref().ok_or_else(|| {
            Error::Config("GOOEY_API_KEY is not set. Please check your environment variables.".into())
        })
    }

    pub fn require_openweather_api_key(&self) -> Result<&str> {
        self.openweather_api_key.as_deref().ok_or_else(|| {
            Error::Config(
                "OPENWEATHER_API_KEY is not set. Please check your environment variables.".into(),
            )
        })
    }
}

fn parse_secs(raw: &str, env_name: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be a whole number of seconds")))
}
