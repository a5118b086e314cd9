//! AWS SDK client construction.
//!
//! This module turns transport options into a configured `aws_sdk_s3::Client`.
//! Credentials and anything not set explicitly come from the standard AWS
//! configuration chain (environment, shared config files, instance metadata).

use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;

use crate::options::{S3Transport, TransportOptions};

/// Build a configured S3 client from transport options.
///
/// # Example
/// ```ignore
/// let client = build_s3_client(&transport_options).await;
/// ```
pub async fn build_s3_client(
    transport_options: &TransportOptions<S3Transport>,
) -> aws_sdk_s3::Client {
    let transport = &transport_options.provider;
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &transport.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(profile) = &transport.profile {
        loader = loader.profile_name(profile);
    }

    if let Some(endpoint_url) = &transport.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    if let Some(timeout) = transport_options.timeout {
        loader = loader.timeout_config(connect_timeout(timeout));
    }

    let shared_config = loader.load().await;
    let config = aws_sdk_s3::config::Builder::from(&shared_config)
        .force_path_style(transport.force_path_style)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

// Only the connection is bounded here; result streams are bounded while
// collecting them, since a select may legitimately stream for a long time.
fn connect_timeout(timeout: std::time::Duration) -> TimeoutConfig {
    TimeoutConfig::builder().connect_timeout(timeout).build()
}
