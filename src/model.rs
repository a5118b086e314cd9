//! Common data models for bucket listings, select responses and result events.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single parsed result record (one line of the select output).
pub type Record = serde_json::Value;

/// Scan counters reported by `Stats` and `Progress` events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub bytes_scanned: Option<i64>,
    pub bytes_processed: Option<i64>,
    pub bytes_returned: Option<i64>,
}

/// One event of a select result stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent {
    /// A fragment of the result body.
    Records(Bytes),

    /// Final scan statistics.
    Stats(ScanStats),

    /// Progress notification, only sent when progress is enabled.
    Progress(ScanStats),

    /// Keep-alive sent while the service is still scanning.
    Continuation,

    /// Successful completion; nothing follows.
    End,

    /// An event this crate does not know about.
    Unknown,
}

/// Response metadata of a select call, dumped as JSON in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub http_status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_request_id: Option<String>,
}

impl ResponseMetadata {
    /// Metadata carrying only a status code.
    pub fn with_status(http_status_code: u16) -> Self {
        Self {
            http_status_code,
            request_id: None,
            extended_request_id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.http_status_code == 200
    }

    /// JSON rendering used in log messages.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// A bucket owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: Option<String>,
}

/// Result of listing the caller's buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketListing {
    /// Display name of the account owning the buckets
    pub owner: Option<String>,

    pub buckets: Vec<Bucket>,
}

impl fmt::Display for BucketListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.buckets.len();
        write!(
            f,
            "{} owns {} bucket{}:",
            self.owner.as_deref().unwrap_or("unknown"),
            count,
            if count == 1 { "" } else { "s" }
        )?;
        for bucket in &self.buckets {
            write!(f, "\n • {}", bucket.name.as_deref().unwrap_or("<unnamed>"))?;
        }
        Ok(())
    }
}
