//! Client configuration.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001/data";

/// Environment variable holding the data endpoint URL.
pub const ENV_ENDPOINT: &str = "PATIENT_MESSAGES_ENDPOINT";

/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "PATIENT_MESSAGES_TIMEOUT_SECS";

/// Settings for the HTTP data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Data endpoint returning the JSON record sequence.
    pub endpoint: Url,
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(endpoint: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            timeout: None,
            connect_timeout: None,
        })
    }

    /// Reads configuration from the process environment.
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup(ENV_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let mut config = Self::new(&endpoint)?;

        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = value.trim().parse().map_err(|_| ConfigError::Number {
                key: ENV_TIMEOUT_SECS,
                value: value.clone(),
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            timeout: None,
            connect_timeout: None,
        }
    }
}

/// Parses and validates an http(s) endpoint.
pub fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::Endpoint {
        value: value.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Scheme(other.to_string())),
    }
}
