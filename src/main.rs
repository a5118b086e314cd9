//! Run one S3 Select query and print the returned records.
//!
//! Run with:
//! ```bash
//! export AWS_PROFILE="your-profile"
//! RUST_LOG=s3query=debug cargo run
//! ```
//!
//! `S3QUERY_BUCKET`, `S3QUERY_KEY` and `S3QUERY_SQL` override the query
//! target; `S3QUERY_TIMEOUT_SECS`, `S3QUERY_REGION`, `S3QUERY_PROFILE` and
//! `S3QUERY_ENDPOINT_URL` tune the transport.

use std::time::Duration;

use s3query::model::Record;
use s3query::options::{S3Transport, SelectRequest, TransportOptions};
use s3query::providers::S3SelectClient;
use s3query::query::{list_buckets, query_object};
use s3query::records::{parse_records_with_delimiter, InvalidRecord};
use tracing_subscriber::EnvFilter;

const DEFAULT_BUCKET: &str = "dock-zendesk-ticket-import";
const DEFAULT_KEY: &str = "dock_test_tickets_sample.json";
const DEFAULT_QUERY: &str = "SELECT * FROM s3object s LIMIT 5";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let transport_options = transport_options_from_env();
    let request = SelectRequest::new(
        env_or("S3QUERY_BUCKET", DEFAULT_BUCKET),
        env_or("S3QUERY_KEY", DEFAULT_KEY),
        env_or("S3QUERY_SQL", DEFAULT_QUERY),
    );

    let client = S3SelectClient::from_options(&transport_options).await;

    match list_buckets(&client, transport_options.timeout).await {
        Ok(listing) => println!("{}", listing),
        Err(e) => {
            tracing::error!("Listing buckets failed: {}", e);
            return;
        }
    }

    match query_object(&client, &request, transport_options.timeout).await {
        Ok(Some(body)) => {
            let delimiter = &request.options.record_delimiter;
            for record in parse_records_with_delimiter(&body, delimiter) {
                print_record(record);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::error!("Query on {} failed: {}", request.location(), e),
    }
}

fn print_record(record: Result<Record, InvalidRecord>) {
    match record {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", value),
        },
        Err(invalid) => println!("{}", invalid),
    }
}

fn transport_options_from_env() -> TransportOptions<S3Transport> {
    let mut transport = S3Transport::default();
    if let Ok(region) = std::env::var("S3QUERY_REGION") {
        transport = transport.with_region(region);
    }
    if let Ok(profile) = std::env::var("S3QUERY_PROFILE") {
        transport = transport.with_profile(profile);
    }
    if let Ok(endpoint_url) = std::env::var("S3QUERY_ENDPOINT_URL") {
        transport = transport.with_endpoint_url(endpoint_url).with_force_path_style(true);
    }

    let mut options = TransportOptions::new(transport);
    match std::env::var("S3QUERY_TIMEOUT_SECS").map(|v| v.parse::<u64>()) {
        Ok(Ok(secs)) => options = options.with_timeout(Duration::from_secs(secs)),
        Ok(Err(e)) => tracing::warn!("Ignoring S3QUERY_TIMEOUT_SECS: {}", e),
        Err(_) => {}
    }
    options
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
