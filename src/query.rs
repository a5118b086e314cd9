//! Query dispatch: submit a select request and collect its result text.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::client::{ClientError, SelectClient};
use crate::model::{BucketListing, ResponseMetadata};
use crate::options::SelectRequest;
use crate::stream::{collect_text_with_timeout, StreamError};

/// Errors that abort a whole query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// List the caller's buckets, bounded by `timeout` when given.
pub async fn list_buckets<C>(
    client: &C,
    timeout: Option<Duration>,
) -> Result<BucketListing, QueryError>
where
    C: SelectClient + ?Sized,
{
    Ok(bounded(timeout, client.list_buckets()).await?)
}

/// Run `request` and collect its result text.
///
/// Returns `Ok(None)` with a logged warning when the service answers with a
/// status other than 200 or without a payload. When `timeout` is given it
/// bounds the dispatch and, separately, the payload collection.
pub async fn query_object<C>(
    client: &C,
    request: &SelectRequest,
    timeout: Option<Duration>,
) -> Result<Option<String>, QueryError>
where
    C: SelectClient + ?Sized,
{
    let response = bounded(timeout, client.select_object_content(request)).await?;

    if !response.metadata.is_success() {
        tracing::warn!("{}", rejected_message(request, &response.metadata));
        return Ok(None);
    }

    let Some(payload) = response.payload else {
        tracing::warn!("S3 Select did not have payload for {}", request.location());
        return Ok(None);
    };

    let text = collect_text_with_timeout(payload, timeout).await?;
    tracing::debug!(location = %request.location(), bytes = text.len(), "select result collected");
    Ok(Some(text))
}

async fn bounded<F, T>(timeout: Option<Duration>, call: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| ClientError::Timeout(limit))?,
        None => call.await,
    }
}

fn rejected_message(request: &SelectRequest, metadata: &ResponseMetadata) -> String {
    format!(
        "S3 Select did not receive 200 for {}. Metadata is {}",
        request.location(),
        metadata.to_json()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{EventStream, SelectResponse};
    use crate::model::{Bucket, BucketListing, SelectEvent};
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::stream::{self, StreamExt};
    use std::io;
    use std::sync::{Arc, Mutex};

    /// In-memory client answering with a scripted response.
    struct FakeClient {
        status: u16,
        events: Mutex<Option<Vec<Result<SelectEvent, ClientError>>>>,
    }

    impl FakeClient {
        fn new(status: u16, events: Option<Vec<Result<SelectEvent, ClientError>>>) -> Self {
            Self {
                status,
                events: Mutex::new(events),
            }
        }
    }

    #[async_trait]
    impl SelectClient for FakeClient {
        async fn list_buckets(&self) -> Result<BucketListing, ClientError> {
            Ok(BucketListing {
                owner: Some("tester".to_string()),
                buckets: vec![Bucket {
                    name: Some("tickets".to_string()),
                }],
            })
        }

        async fn select_object_content(
            &self,
            _request: &SelectRequest,
        ) -> Result<SelectResponse, ClientError> {
            let payload = self
                .events
                .lock()
                .unwrap()
                .take()
                .map(|events| -> EventStream { stream::iter(events).boxed() });
            Ok(SelectResponse {
                metadata: ResponseMetadata::with_status(self.status),
                payload,
            })
        }
    }

    /// Client whose transport always fails.
    struct BrokenClient;

    #[async_trait]
    impl SelectClient for BrokenClient {
        async fn list_buckets(&self) -> Result<BucketListing, ClientError> {
            Err(ClientError::Service("dispatch failure".to_string()))
        }

        async fn select_object_content(
            &self,
            _request: &SelectRequest,
        ) -> Result<SelectResponse, ClientError> {
            Err(ClientError::Service("dispatch failure".to_string()))
        }
    }

    /// Client whose calls are accepted but never answered.
    struct HangingClient;

    #[async_trait]
    impl SelectClient for HangingClient {
        async fn list_buckets(&self) -> Result<BucketListing, ClientError> {
            futures::future::pending().await
        }

        async fn select_object_content(
            &self,
            _request: &SelectRequest,
        ) -> Result<SelectResponse, ClientError> {
            futures::future::pending().await
        }
    }

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn request() -> SelectRequest {
        SelectRequest::new("tickets", "sample.json", "SELECT * FROM s3object s LIMIT 5")
    }

    fn records(bytes: &'static [u8]) -> Result<SelectEvent, ClientError> {
        Ok(SelectEvent::Records(Bytes::from_static(bytes)))
    }

    #[tokio::test]
    async fn test_successful_query() {
        let client = FakeClient::new(
            200,
            Some(vec![records(b"{\"a\":1}\n{\"a\":"), records(b"2}"), Ok(SelectEvent::End)]),
        );
        let body = query_object(&client, &request(), None).await.unwrap();
        assert_eq!(body.as_deref(), Some("{\"a\":1}\n{\"a\":2}"));
    }

    #[tokio::test]
    async fn test_non_success_status_yields_no_body() {
        let client = FakeClient::new(500, None);
        let body = query_object(&client, &request(), None).await.unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_logs_one_diagnostic() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = FakeClient::new(500, None);
        assert!(query_object(&client, &request(), None).await.unwrap().is_none());

        let output = logs.contents();
        let diagnostics: Vec<&str> = output.lines().filter(|l| l.contains("WARN")).collect();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("did not receive 200 for tickets/sample.json"));
        assert!(diagnostics[0].contains("\"httpStatusCode\":500"));
    }

    #[test]
    fn test_rejected_message_mentions_metadata() {
        let message = rejected_message(&request(), &ResponseMetadata::with_status(500));
        assert_eq!(
            message,
            "S3 Select did not receive 200 for tickets/sample.json. Metadata is {\"httpStatusCode\":500}"
        );
    }

    #[tokio::test]
    async fn test_missing_payload_yields_no_body() {
        let client = FakeClient::new(200, None);
        assert!(query_object(&client, &request(), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stream_error_aborts_query() {
        let client = FakeClient::new(
            200,
            Some(vec![
                records(b"{\"a\":1}"),
                Err(ClientError::Stream("reset".to_string())),
            ]),
        );
        let err = query_object(&client, &request(), None).await.unwrap_err();
        assert!(matches!(err, QueryError::Stream(StreamError::Read(_))));
    }

    #[tokio::test]
    async fn test_incomplete_stream_aborts_query() {
        let client = FakeClient::new(200, Some(vec![records(b"{\"a\":1}")]));
        let err = query_object(&client, &request(), None).await.unwrap_err();
        assert_eq!(err, QueryError::Stream(StreamError::Incomplete));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let err = query_object(&BrokenClient, &request(), None).await.unwrap_err();
        assert!(matches!(err, QueryError::Client(ClientError::Service(_))));
    }

    #[tokio::test]
    async fn test_unanswered_select_times_out() {
        let limit = Duration::from_millis(50);
        let result = tokio::time::timeout(
            Duration::from_millis(500),
            query_object(&HangingClient, &request(), Some(limit)),
        )
        .await
        .expect("query_object ignored its timeout");
        assert_eq!(result.unwrap_err(), QueryError::Client(ClientError::Timeout(limit)));
    }

    #[tokio::test]
    async fn test_unanswered_listing_times_out() {
        let limit = Duration::from_millis(50);
        let result = tokio::time::timeout(
            Duration::from_millis(500),
            list_buckets(&HangingClient, Some(limit)),
        )
        .await
        .expect("list_buckets ignored its timeout");
        assert_eq!(result.unwrap_err(), QueryError::Client(ClientError::Timeout(limit)));
    }

    #[tokio::test]
    async fn test_list_buckets_passes_through() {
        let client = FakeClient::new(200, None);
        let listing = list_buckets(&client, Some(Duration::from_secs(1))).await.unwrap();
        assert_eq!(listing.owner.as_deref(), Some("tester"));
        assert_eq!(listing.buckets.len(), 1);
    }
}
