//! HTTP record source

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::ClientConfig;
use crate::error::LoadError;
use crate::model::Record;
use crate::model::decode_records;
use crate::source::RecordSource;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Fetches the record set from the configured data endpoint.
///
/// Cheap to clone (uses `Arc` internally). Each [`fetch`](RecordSource::fetch)
/// is a single GET with no retry.
///
/// # Example
///
/// ```ignore
/// use patient_messages_lib::MessageClient;
///
/// let client = MessageClient::builder()
///     .endpoint("http://localhost:3001/data".parse()?)
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let records = client.fetch().await?;
/// ```
#[derive(Clone)]
pub struct MessageClient {
    inner: Arc<MessageClientInner>,
}

struct MessageClientInner {
    endpoint: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl MessageClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> MessageClientBuilder<Missing> {
        MessageClientBuilder::new()
    }

    /// Builds a client from a [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, LoadError> {
        let mut builder = Self::builder().endpoint(config.endpoint.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder.build()
    }

    /// Returns the data endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }
}

impl std::fmt::Debug for MessageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RecordSource for MessageClient {
    async fn fetch(&self) -> Result<Vec<Record>, LoadError> {
        log::debug!("Fetching records from {}", self.inner.endpoint);

        let mut request = self
            .inner
            .http_client
            .get(self.inner.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                truncate(&body, MAX_ERROR_BODY).to_string()
            };
            return Err(LoadError::http(status.as_u16(), message));
        }

        let body = response.text().await?;
        let records = decode_records(&body).map_err(|e| {
            LoadError::decode_with_body(e.to_string(), truncate(&body, MAX_ERROR_BODY))
        })?;

        log::debug!("Fetched {} records", records.len());
        Ok(records)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`MessageClient`].
///
/// The endpoint is required and enforced at compile time.
pub struct MessageClientBuilder<E> {
    endpoint: E,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl MessageClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            endpoint: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the data endpoint.
    pub fn endpoint(self, endpoint: Url) -> MessageClientBuilder<Set<Url>> {
        MessageClientBuilder {
            endpoint: Set(endpoint),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for MessageClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> MessageClientBuilder<E> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Ignored when a custom HTTP client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl MessageClientBuilder<Set<Url>> {
    /// Builds the [`MessageClient`].
    pub fn build(self) -> Result<MessageClient, LoadError> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        let endpoint = self.endpoint.0;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(LoadError::InvalidUrl(endpoint.to_string()));
        }

        Ok(MessageClient {
            inner: Arc::new(MessageClientInner {
                endpoint,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
