//! Environment configuration
//!
//! Settings are layered the same way everywhere: built-in defaults, then an
//! optional file, then `NAUAN_*` environment variables. They are loaded once
//! at startup and never mutated afterwards.

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: f64 = 10_000.0;

/// Default storage key for the bearer token
pub const DEFAULT_STORAGE_KEY: &str = "access_token";

/// Default origin advertised in CORS request headers
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not defined")]
    Missing(&'static str),

    #[error("Timeout value {0} is not valid, expected a finite positive number of milliseconds")]
    InvalidTimeout(f64),

    #[error("CORS origin {0:?} is not a valid header value")]
    InvalidCorsOrigin(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the backend API
    #[serde(default)]
    pub api_url: String,

    /// Default request timeout in milliseconds
    pub timeout_ms: f64,

    /// Storage key holding the bearer token
    pub storage_key: String,

    /// Origin sent in `Access-Control-Allow-Origin`
    pub cors_origin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file, and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the result is invalid
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("timeout_ms", defaults.timeout_ms)?
            .set_default("storage_key", defaults.storage_key)?
            .set_default("cors_origin", defaults.cors_origin)?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let settings: Self = builder
            .add_source(config::Environment::with_prefix("NAUAN"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants every request relies on
    ///
    /// # Errors
    ///
    /// Returns an error for an empty API URL, an unusable timeout or a CORS
    /// origin that cannot be sent as a header
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Missing("api_url"));
        }
        timeout_from_millis(self.timeout_ms)?;
        if HeaderValue::from_str(&self.cors_origin).is_err() {
            return Err(ConfigError::InvalidCorsOrigin(self.cors_origin.clone()));
        }
        Ok(())
    }

    /// The default timeout as a duration
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout_ms` is not finite and positive
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        timeout_from_millis(self.timeout_ms)
    }
}

/// Convert a millisecond count into a request timeout
///
/// # Errors
///
/// Rejects NaN, infinities, zero and negative values
pub fn timeout_from_millis(millis: f64) -> Result<Duration, ConfigError> {
    if !millis.is_finite() || millis <= 0.0 {
        return Err(ConfigError::InvalidTimeout(millis));
    }
    Duration::try_from_secs_f64(millis / 1000.0).map_err(|_| ConfigError::InvalidTimeout(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_unusable_timeouts() {
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                timeout_from_millis(value),
                Err(ConfigError::InvalidTimeout(_))
            ));
        }
    }

    #[test]
    fn converts_millis() {
        assert_eq!(
            timeout_from_millis(1500.0).unwrap(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn validate_requires_api_url() {
        let settings = Settings::default();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Missing("api_url"))
        ));
    }

    #[test]
    fn validate_rejects_unsendable_cors_origin() {
        let settings = Settings {
            api_url: "https://api.example.test".into(),
            cors_origin: "http://admin.test\n".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidCorsOrigin(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "api_url = \"https://api.example.test/\"\ntimeout_ms = 2500\nstorage_key = \"at\""
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.api_url, "https://api.example.test/");
        assert_eq!(settings.timeout().unwrap(), Duration::from_millis(2500));
        assert_eq!(settings.storage_key, "at");
        assert_eq!(settings.cors_origin, DEFAULT_CORS_ORIGIN);
    }

    #[test]
    fn file_with_invalid_timeout_aborts() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_url = \"https://api.example.test/\"\ntimeout_ms = -5").unwrap();

        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }
}
