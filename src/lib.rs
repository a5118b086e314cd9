//! # s3query - S3 Select query client
//!
//! A small library for running SQL queries against single objects in S3
//! with S3 Select, and turning the streamed answer into JSON records.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Trait-based client seam (`SelectClient`) with an `aws-sdk-s3` implementation
//! - Byte-exact collection of result event streams, with optional timeout
//! - Per-line JSON record parsing that survives malformed lines
//!
//! ## Flow
//!
//! 1. **List** the caller's buckets (`SelectClient::list_buckets`)
//! 2. **Query** one object (`SelectClient::select_object_content`)
//! 3. **Collect** the result events into text (`stream::collect_text`)
//! 4. **Parse** each line into a record (`records::parse_records`)
//!
//! ## Example
//! ```no_run
//! use s3query::options::{S3Transport, SelectRequest, TransportOptions};
//! use s3query::providers::S3SelectClient;
//! use s3query::query::query_object;
//! use s3query::records::parse_records;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport_options = TransportOptions::new(S3Transport::default())
//!         .with_timeout(Duration::from_secs(60));
//!     let client = S3SelectClient::from_options(&transport_options).await;
//!
//!     let request = SelectRequest::new("my-bucket", "data.json", "SELECT * FROM s3object s LIMIT 5");
//!     if let Some(body) = query_object(&client, &request, transport_options.timeout).await? {
//!         for record in parse_records(&body) {
//!             match record {
//!                 Ok(value) => println!("{}", value),
//!                 Err(invalid) => println!("{}", invalid),
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod aws;
pub mod client;
pub mod model;
pub mod options;
pub mod providers;
pub mod query;
pub mod records;
pub mod stream;

// Re-exports for convenience
pub use client::{ClientError, EventStream, SelectClient, SelectResponse};
pub use model::{BucketListing, Record, SelectEvent};
pub use query::{query_object, QueryError};
pub use stream::{collect_text, StreamError};
