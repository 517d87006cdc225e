//! The Bucketry service facade.
//!
//! [`BucketryService`] owns the injected storage gateway and the application
//! configuration. Individual operations are implemented in the
//! [`crate::ops`] submodules and exposed as methods on this struct.

use crate::config::AppConfig;
use crate::error::{ServiceResult, StorageServiceError};
use crate::gateway::{BucketExistence, StorageGateway};

/// The service that carries every bucket and object operation.
///
/// Generic over the gateway so tests can substitute an in-memory fake for
/// the AWS implementation.
#[derive(Debug)]
pub struct BucketryService<G: StorageGateway> {
    pub(crate) gateway: G,
    pub(crate) config: AppConfig,
}

impl<G: StorageGateway> BucketryService<G> {
    /// Create a service over the given gateway and configuration.
    #[must_use]
    pub fn new(gateway: G, config: AppConfig) -> Self {
        Self { gateway, config }
    }

    /// Returns the service configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Fail unless the bucket exists and is accessible.
    ///
    /// A missing bucket is an expected outcome of the existence check, not
    /// an exceptional one; it is only here that it becomes an error.
    pub(crate) async fn ensure_bucket_exists(&self, bucket: &str) -> ServiceResult<()> {
        match self.gateway.bucket_existence(bucket).await? {
            BucketExistence::Exists => Ok(()),
            BucketExistence::NotFound => Err(StorageServiceError::BucketNotFound {
                bucket: bucket.to_owned(),
            }),
            BucketExistence::Forbidden => Err(StorageServiceError::Forbidden {
                bucket: bucket.to_owned(),
            }),
        }
    }
}
