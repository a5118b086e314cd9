//! Generic options structures for select requests and transport configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Layout of the JSON input object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JsonInputType {
    /// One JSON value per line
    #[default]
    Lines,

    /// A single JSON document
    Document,
}

/// Compression applied to the queried object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Bzip2,
}

/// Serialization and progress settings of a select request.
///
/// The default reads line-delimited uncompressed JSON, writes newline
/// delimited JSON and asks for progress notifications.
///
/// # Example
/// ```rust
/// use s3query::options::{Compression, JsonInputType, SelectOptions};
///
/// let options = SelectOptions::default()
///     .with_input_type(JsonInputType::Document)
///     .with_compression(Compression::Gzip);
/// assert_eq!(options.record_delimiter, "\n");
/// assert!(options.progress);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOptions {
    pub input_type: JsonInputType,

    pub compression: Compression,

    /// Delimiter between output records
    pub record_delimiter: String,

    /// Request progress events while the object is scanned
    pub progress: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            input_type: JsonInputType::Lines,
            compression: Compression::None,
            record_delimiter: "\n".to_string(),
            progress: true,
        }
    }
}

impl SelectOptions {
    pub fn with_input_type(mut self, input_type: JsonInputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}

/// A SQL query against one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectRequest {
    pub bucket: String,
    pub key: String,

    /// SQL expression, e.g. `SELECT * FROM s3object s LIMIT 5`
    pub expression: String,

    pub options: SelectOptions,
}

impl SelectRequest {
    /// Create a request with default select options.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            expression: expression.into(),
            options: SelectOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SelectOptions) -> Self {
        self.options = options;
        self
    }

    /// `bucket/key`, used in log messages.
    pub fn location(&self) -> String {
        format!("{}/{}", self.bucket, self.key)
    }
}

/// Generic transport options containing truly generic transport fields
/// and provider-specific transport configuration.
///
/// # Type Parameters
/// - `T`: Provider-specific transport options type
///
/// # Example
/// ```rust
/// use s3query::options::{S3Transport, TransportOptions};
/// use std::time::Duration;
///
/// let options = TransportOptions::new(S3Transport::default().with_region("eu-central-1"))
///     .with_timeout(Duration::from_secs(30));
/// assert_eq!(options.provider.region.as_deref(), Some("eu-central-1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransportOptions<T> {
    /// Limit on connecting and on collecting a result stream
    pub timeout: Option<Duration>,

    /// Provider-specific transport options
    pub provider: T,
}

/// S3-specific transport options.
/// Anything left `None` falls back to the standard AWS configuration chain.
#[derive(Debug, Clone, Default)]
pub struct S3Transport {
    pub region: Option<String>,

    /// Named profile from the shared AWS config files
    pub profile: Option<String>,

    /// Custom endpoint, e.g. for S3-compatible stores
    pub endpoint_url: Option<String>,

    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    pub force_path_style: bool,
}

impl S3Transport {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn with_force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }
}

impl<T> TransportOptions<T> {
    /// Create new transport options with provider-specific configuration.
    pub fn new(provider: T) -> Self {
        Self {
            timeout: None,
            provider,
        }
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_select_options() {
        let options = SelectOptions::default();
        assert_eq!(options.input_type, JsonInputType::Lines);
        assert_eq!(options.compression, Compression::None);
        assert_eq!(options.record_delimiter, "\n");
        assert!(options.progress);
    }

    #[test]
    fn test_select_request() {
        let request = SelectRequest::new("bucket", "data.json", "SELECT * FROM s3object s")
            .with_options(SelectOptions::default().with_progress(false));
        assert_eq!(request.location(), "bucket/data.json");
        assert!(!request.options.progress);
    }

    #[test]
    fn test_transport_builders() {
        let options = TransportOptions::new(
            S3Transport::default()
                .with_profile("dev")
                .with_endpoint_url("http://localhost:9000")
                .with_force_path_style(true),
        )
        .with_timeout(Duration::from_secs(5));

        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.provider.profile.as_deref(), Some("dev"));
        assert!(options.provider.force_path_style);
        assert!(options.provider.region.is_none());
    }

    #[test]
    fn test_options_serde_names() {
        let json = serde_json::to_string(&SelectOptions::default()).unwrap();
        assert!(json.contains("\"LINES\""));
        assert!(json.contains("\"NONE\""));
    }
}
