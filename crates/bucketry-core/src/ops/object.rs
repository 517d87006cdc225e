//! Object operations: folder listings and uploads.

use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use crate::error::{ServiceResult, StorageServiceError};
use crate::gateway::{ObjectUpload, PresignedUpload, StorageGateway};
use crate::listing::{FolderListing, build_listing};
use crate::service::BucketryService;

impl<G: StorageGateway> BucketryService<G> {
    /// List one folder level of a bucket as file and folder entries.
    pub async fn list_folder(&self, bucket: &str, folder: &str) -> ServiceResult<FolderListing> {
        let listing = self
            .gateway
            .list_objects(
                bucket,
                folder,
                Some("/"),
                self.config.listing_page_size,
                None,
            )
            .await?;

        let view = build_listing(bucket, &listing);
        debug!(
            bucket = %bucket,
            prefix = %folder,
            entries = view.entries.len(),
            "list_folder completed"
        );
        Ok(view)
    }

    /// Generate a presigned upload for a key.
    pub async fn presign_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<&str>,
    ) -> ServiceResult<PresignedUpload> {
        validate_key(key)?;
        // Presigning is a local signature computation; check the bucket so
        // clients don't receive working-looking URLs into nothing.
        self.ensure_bucket_exists(bucket).await?;

        self.gateway
            .presign_upload(
                bucket,
                key,
                content_type,
                Duration::from_secs(self.config.presign_expiry_secs),
            )
            .await
    }

    /// Upload an object body on the client's behalf.
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> ServiceResult<ObjectUpload> {
        validate_key(key)?;
        self.gateway.put_object(bucket, key, body, content_type).await
    }
}

fn validate_key(key: &str) -> ServiceResult<()> {
    if key.is_empty() {
        return Err(StorageServiceError::InvalidArgument {
            message: "object key must not be empty".to_owned(),
        });
    }
    Ok(())
}
