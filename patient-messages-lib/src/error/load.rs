//! Load error types

/// Errors that can occur while loading the record set.
///
/// Every variant is terminal for the load attempt that produced it. The
/// [`RecordStore`](crate::store::RecordStore) turns it into
/// [`LoadState::Failed`](crate::store::LoadState::Failed) carrying the
/// display message; it is never propagated past the store.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Network failure while talking to the data endpoint.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The response body was not a sequence of records.
    #[error("Response decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// The configured endpoint is not a usable URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl LoadError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new decode error with the raw response body.
    pub fn decode_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the response arrived but could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_display() {
        let err = LoadError::http(503, "Service Unavailable");
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
        assert_eq!(err.status_code(), Some(503));
        assert!(!err.is_decode());
    }

    #[test]
    fn test_decode_from_serde() {
        let err: LoadError = serde_json::from_str::<Vec<u32>>("{}").unwrap_err().into();
        assert!(err.is_decode());
        assert!(err.to_string().starts_with("Response decode error:"));
    }
}
