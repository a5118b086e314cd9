//! Collection of select result streams into a single text body.
//!
//! A select call answers with a sequence of events. Result bytes arrive in
//! `Records` events, split at arbitrary byte boundaries, and an `End` event
//! marks a complete result:
//!
//! ```text
//! Records("{\"a\":1}\n{\"a\":")  Records("2}")  Stats(..)  End
//! ```
//!
//! Fragments are concatenated as raw bytes and decoded once, after `End`,
//! so multi-byte characters split across fragments survive.

use std::fmt::Display;
use std::time::Duration;

use bytes::BytesMut;
use futures::{Stream, StreamExt};
use thiserror::Error;

use crate::model::SelectEvent;

/// Errors that can occur while collecting a result stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Stream read error: {0}")]
    Read(String),

    #[error("Stream ended without an end event")]
    Incomplete,

    #[error("Stream timed out after {0:?}")]
    Timeout(Duration),
}

/// Collect a result stream into its decoded text.
///
/// Resolves with the UTF-8 text of all `Records` payloads, in arrival order,
/// once `End` is seen. The stream is not polled past `End`.
///
/// # Errors
/// - `StreamError::Read` if the stream yields an error before `End`
/// - `StreamError::Incomplete` if the stream finishes without `End`
///
/// # Example
/// ```
/// use bytes::Bytes;
/// use futures::stream;
/// use s3query::model::SelectEvent;
/// use s3query::stream::collect_text;
///
/// let events = stream::iter(vec![
///     Ok::<_, std::convert::Infallible>(SelectEvent::Records(Bytes::from_static(b"{\"a\":"))),
///     Ok(SelectEvent::Records(Bytes::from_static(b"1}"))),
///     Ok(SelectEvent::End),
/// ]);
/// let text = futures::executor::block_on(collect_text(events)).unwrap();
/// assert_eq!(text, "{\"a\":1}");
/// ```
pub async fn collect_text<S, E>(events: S) -> Result<String, StreamError>
where
    S: Stream<Item = Result<SelectEvent, E>>,
    E: Display,
{
    futures::pin_mut!(events);

    let mut buffer = BytesMut::new();

    while let Some(event) = events.next().await {
        match event.map_err(|e| StreamError::Read(e.to_string()))? {
            SelectEvent::Records(payload) => buffer.extend_from_slice(&payload),
            SelectEvent::Stats(stats) => {
                tracing::debug!(
                    bytes_scanned = ?stats.bytes_scanned,
                    bytes_processed = ?stats.bytes_processed,
                    bytes_returned = ?stats.bytes_returned,
                    "select stats"
                );
            }
            SelectEvent::Progress(stats) => {
                tracing::debug!(
                    bytes_scanned = ?stats.bytes_scanned,
                    bytes_processed = ?stats.bytes_processed,
                    "select progress"
                );
            }
            SelectEvent::End => return Ok(decode(buffer)),
            SelectEvent::Continuation | SelectEvent::Unknown => {}
        }
    }

    Err(StreamError::Incomplete)
}

/// Same as [`collect_text`], bounded by an optional timeout.
///
/// With `None` the collection waits as long as the stream does.
pub async fn collect_text_with_timeout<S, E>(
    events: S,
    timeout: Option<Duration>,
) -> Result<String, StreamError>
where
    S: Stream<Item = Result<SelectEvent, E>>,
    E: Display,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, collect_text(events))
            .await
            .map_err(|_| StreamError::Timeout(limit))?,
        None => collect_text(events).await,
    }
}

// Invalid sequences become U+FFFD.
fn decode(buffer: BytesMut) -> String {
    String::from_utf8(Vec::from(buffer))
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
