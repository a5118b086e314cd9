//! Amazon S3 select client implementation.
//!
//! This module implements the `SelectClient` trait on top of `aws-sdk-s3`.
//! The SDK owns request signing and event-stream framing; this module only
//! maps requests, responses and events between the SDK and crate types.
//! See: <https://docs.aws.amazon.com/AmazonS3/latest/API/API_SelectObjectContent.html>

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::select_object_content::SelectObjectContentOutput;
use aws_sdk_s3::operation::{RequestId, RequestIdExt};
use aws_sdk_s3::types::{
    CompressionType, ExpressionType, InputSerialization, JsonInput, JsonOutput, JsonType,
    OutputSerialization, Progress, RequestProgress, SelectObjectContentEventStream, Stats,
};
use bytes::Bytes;
use futures::stream::{self, StreamExt};

use crate::aws::build_s3_client;
use crate::client::{ClientError, EventStream, SelectClient, SelectResponse};
use crate::model::{Bucket, BucketListing, ResponseMetadata, ScanStats, SelectEvent};
use crate::options::{
    Compression, JsonInputType, S3Transport, SelectOptions, SelectRequest, TransportOptions,
};

/// S3 client for bucket listing and select queries.
#[derive(Debug, Clone)]
pub struct S3SelectClient {
    client: aws_sdk_s3::Client,
}

impl S3SelectClient {
    /// Wrap an existing SDK client.
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Load AWS configuration and build a client from transport options.
    pub async fn from_options(transport_options: &TransportOptions<S3Transport>) -> Self {
        Self::new(build_s3_client(transport_options).await)
    }

    /// Adapt the SDK event receiver into an `EventStream`.
    ///
    /// The stream ends after the first receive error.
    fn event_stream(output: SelectObjectContentOutput) -> EventStream {
        stream::unfold(Some(output), |state| async move {
            let mut output = state?;
            match output.payload.recv().await {
                Ok(Some(event)) => Some((Ok(SelectEvent::from(event)), Some(output))),
                Ok(None) => None,
                Err(e) => Some((
                    Err(ClientError::Stream(DisplayErrorContext(&e).to_string())),
                    None,
                )),
            }
        })
        .boxed()
    }
}

#[async_trait]
impl SelectClient for S3SelectClient {
    async fn list_buckets(&self) -> Result<BucketListing, ClientError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| ClientError::Service(DisplayErrorContext(&e).to_string()))?;

        Ok(BucketListing {
            owner: output
                .owner()
                .and_then(|owner| owner.display_name())
                .map(str::to_string),
            buckets: output
                .buckets()
                .iter()
                .map(|bucket| Bucket {
                    name: bucket.name().map(str::to_string),
                })
                .collect(),
        })
    }

    async fn select_object_content(
        &self,
        request: &SelectRequest,
    ) -> Result<SelectResponse, ClientError> {
        let result = self
            .client
            .select_object_content()
            .bucket(&request.bucket)
            .key(&request.key)
            .expression(&request.expression)
            .expression_type(ExpressionType::Sql)
            .input_serialization(input_serialization(&request.options))
            .output_serialization(output_serialization(&request.options))
            .request_progress(
                RequestProgress::builder()
                    .enabled(request.options.progress)
                    .build(),
            )
            .send()
            .await;

        match result {
            Ok(output) => {
                let metadata = ResponseMetadata {
                    http_status_code: 200,
                    request_id: output.request_id().map(str::to_string),
                    extended_request_id: output.extended_request_id().map(str::to_string),
                };
                Ok(SelectResponse {
                    metadata,
                    payload: Some(Self::event_stream(output)),
                })
            }
            Err(SdkError::ServiceError(e)) => {
                tracing::debug!(error = %DisplayErrorContext(e.err()), "select rejected by service");
                Ok(SelectResponse {
                    metadata: ResponseMetadata {
                        http_status_code: e.raw().status().as_u16(),
                        request_id: e.err().request_id().map(str::to_string),
                        extended_request_id: e.err().extended_request_id().map(str::to_string),
                    },
                    payload: None,
                })
            }
            Err(e) => Err(ClientError::Service(DisplayErrorContext(&e).to_string())),
        }
    }
}

fn input_serialization(options: &SelectOptions) -> InputSerialization {
    let json_type = match options.input_type {
        JsonInputType::Lines => JsonType::Lines,
        JsonInputType::Document => JsonType::Document,
    };
    let compression = match options.compression {
        Compression::None => CompressionType::None,
        Compression::Gzip => CompressionType::Gzip,
        Compression::Bzip2 => CompressionType::Bzip2,
    };

    InputSerialization::builder()
        .compression_type(compression)
        .json(JsonInput::builder().r#type(json_type).build())
        .build()
}

fn output_serialization(options: &SelectOptions) -> OutputSerialization {
    OutputSerialization::builder()
        .json(
            JsonOutput::builder()
                .record_delimiter(&options.record_delimiter)
                .build(),
        )
        .build()
}

impl From<&Stats> for ScanStats {
    fn from(stats: &Stats) -> Self {
        ScanStats {
            bytes_scanned: stats.bytes_scanned(),
            bytes_processed: stats.bytes_processed(),
            bytes_returned: stats.bytes_returned(),
        }
    }
}

impl From<&Progress> for ScanStats {
    fn from(progress: &Progress) -> Self {
        ScanStats {
            bytes_scanned: progress.bytes_scanned(),
            bytes_processed: progress.bytes_processed(),
            bytes_returned: progress.bytes_returned(),
        }
    }
}

impl From<SelectObjectContentEventStream> for SelectEvent {
    fn from(event: SelectObjectContentEventStream) -> Self {
        match event {
            SelectObjectContentEventStream::Records(records) => SelectEvent::Records(
                records
                    .payload()
                    .map(|blob| Bytes::copy_from_slice(blob.as_ref()))
                    .unwrap_or_default(),
            ),
            SelectObjectContentEventStream::Stats(stats) => {
                SelectEvent::Stats(stats.details().map(ScanStats::from).unwrap_or_default())
            }
            SelectObjectContentEventStream::Progress(progress) => SelectEvent::Progress(
                progress
                    .details()
                    .map(ScanStats::from)
                    .unwrap_or_default(),
            ),
            SelectObjectContentEventStream::Cont(_) => SelectEvent::Continuation,
            SelectObjectContentEventStream::End(_) => SelectEvent::End,
            _ => SelectEvent::Unknown,
        }
    }
}
