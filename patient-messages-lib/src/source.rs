//! Record source abstraction.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::model::Record;

/// Something that can produce the record set in a single attempt.
///
/// The HTTP [`MessageClient`](crate::MessageClient) is the production
/// implementation. Implementations must not retry on their own; a failed
/// attempt is reported as-is.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use patient_messages_lib::{LoadError, Record, RecordSource};
///
/// struct Fixed(Vec<Record>);
///
/// #[async_trait]
/// impl RecordSource for Fixed {
///     async fn fetch(&self) -> Result<Vec<Record>, LoadError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetches and decodes the full record sequence.
    async fn fetch(&self) -> Result<Vec<Record>, LoadError>;
}

#[async_trait]
impl<S: RecordSource + ?Sized> RecordSource for Arc<S> {
    async fn fetch(&self) -> Result<Vec<Record>, LoadError> {
        (**self).fetch().await
    }
}
