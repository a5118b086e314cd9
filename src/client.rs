//! Core client trait and error types.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::model::{BucketListing, ResponseMetadata, SelectEvent};
use crate::options::SelectRequest;

/// Errors that can occur during client operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Service error: {0}")]
    Service(String),

    #[error("Event stream error: {0}")]
    Stream(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Result events of one select call, in arrival order.
pub type EventStream = BoxStream<'static, Result<SelectEvent, ClientError>>;

/// Answer to a select call.
///
/// `payload` is only present on success; a response with a non-200 status
/// carries metadata alone.
pub struct SelectResponse {
    pub metadata: ResponseMetadata,
    pub payload: Option<EventStream>,
}

impl std::fmt::Debug for SelectResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectResponse")
            .field("metadata", &self.metadata)
            .field("payload", &self.payload.as_ref().map(|_| "EventStream"))
            .finish()
    }
}

/// Storage service able to list buckets and run select queries.
///
/// A client is created once and passed explicitly to every query, so the
/// underlying connection pool and credentials are reused across calls.
///
/// # Example
/// ```rust,ignore
/// struct MyStore { /* ... */ }
///
/// #[async_trait]
/// impl SelectClient for MyStore {
///     async fn list_buckets(&self) -> Result<BucketListing, ClientError> {
///         // Implementation
///     }
///
///     async fn select_object_content(
///         &self,
///         request: &SelectRequest,
///     ) -> Result<SelectResponse, ClientError> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait SelectClient: Send + Sync {
    /// List the buckets owned by the caller.
    async fn list_buckets(&self) -> Result<BucketListing, ClientError>;

    /// Submit one select request.
    ///
    /// Transport failures are errors; a service answer with any status is
    /// returned as a `SelectResponse`.
    async fn select_object_content(
        &self,
        request: &SelectRequest,
    ) -> Result<SelectResponse, ClientError>;
}
