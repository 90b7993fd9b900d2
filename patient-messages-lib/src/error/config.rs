//! Configuration error types

/// Errors produced while reading client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The endpoint could not be parsed as a URL.
    #[error("invalid endpoint {value:?}")]
    Endpoint {
        /// The rejected value.
        value: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The endpoint parsed but is not an http(s) URL.
    #[error("unsupported endpoint scheme {0:?}")]
    Scheme(String),

    /// A numeric setting could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    Number {
        /// Environment variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}
