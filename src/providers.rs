//! Storage service implementations.

pub mod s3;

// Re-export for convenience
pub use s3::S3SelectClient;
