//! Core domain logic for Bucketry, an opinionated REST backend over S3.
//!
//! The crate's centerpiece is the access model: deriving a three-way
//! classification (private / objects-may-be-public / public) from the
//! provider's public-access-block, bucket-policy, and ACL settings, and
//! mutating those settings consistently when a client requests a new access
//! level. Around it sit the bucket lifecycle orchestration, a folder-style
//! listing formatter, name validation, and a static region catalog.
//!
//! # Architecture
//!
//! ```text
//! HTTP boundary (bucketry-http)
//!        |
//!        v
//! BucketryService (ops: bucket / access / object)
//!        |
//!        v
//! StorageGateway trait  --->  AwsStorageGateway (aws-sdk-s3)
//! ```
//!
//! The gateway is injected, never global: production wires in
//! [`AwsStorageGateway`], tests substitute an in-memory fake. Provider state
//! is the single source of truth; every access query re-reads the signals,
//! and nothing here caches them.

pub mod access;
pub mod config;
pub mod error;
pub mod gateway;
pub mod listing;
mod ops;
pub mod regions;
pub mod service;
pub mod validation;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::AppConfig;
pub use error::{ServiceResult, StorageServiceError};
pub use gateway::StorageGateway;
pub use gateway::aws::AwsStorageGateway;
pub use ops::BucketRegion;
pub use service::BucketryService;
