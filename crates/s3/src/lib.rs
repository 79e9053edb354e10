//! cw-s3: S3 SDK adapter for cold2warm
//!
//! Implements the cw-core ObjectStore trait on top of aws-sdk-s3, limited to
//! the listing and restore calls the pipeline issues.

pub mod client;

pub use client::S3Client;
