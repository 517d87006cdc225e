//! Bucket lifecycle operations.
//!
//! Multi-step creation and deletion, plus the bucket listing and region
//! lookups. Steps run strictly in order; a failing step aborts the rest of
//! the sequence and surfaces unchanged.

use serde::Serialize;
use tracing::{debug, info};

use crate::access::AccessLevel;
use crate::error::{ServiceResult, StorageServiceError};
use crate::gateway::{BucketExistence, BucketList, StorageGateway};
use crate::regions;
use crate::service::BucketryService;
use crate::validation::validate_bucket_name;

/// Provider limit on keys per batch-delete request.
const DELETE_BATCH_LIMIT: usize = 1000;

/// A bucket's region joined against the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRegion {
    /// Region identifier.
    pub id: String,
    /// Catalog display name; `None` for regions the catalog does not know.
    pub name: Option<String>,
}

impl<G: StorageGateway> BucketryService<G> {
    /// List all buckets owned by the account.
    pub async fn list_buckets(&self) -> ServiceResult<BucketList> {
        let list = self.gateway.list_buckets().await?;
        debug!(count = list.buckets.len(), "list_buckets completed");
        Ok(list)
    }

    /// Create a bucket and bring it to the requested access posture.
    ///
    /// Sequence: validate name, existence check, create, baseline ACL,
    /// permissive CORS, apply access level. Returns the provider-reported
    /// location.
    pub async fn create_bucket(
        &self,
        name: &str,
        level: AccessLevel,
        region: Option<&str>,
    ) -> ServiceResult<String> {
        validate_bucket_name(name)?;

        let region = match region {
            Some(id) => {
                if regions::by_id(id).is_none() {
                    return Err(StorageServiceError::InvalidArgument {
                        message: format!("unknown region: {id}"),
                    });
                }
                id.to_owned()
            }
            None => self.config.default_region.clone(),
        };

        match self.gateway.bucket_existence(name).await? {
            BucketExistence::Exists => {
                return Err(StorageServiceError::BucketAlreadyExists {
                    bucket: name.to_owned(),
                });
            }
            BucketExistence::Forbidden => {
                return Err(StorageServiceError::Forbidden {
                    bucket: name.to_owned(),
                });
            }
            BucketExistence::NotFound => {}
        }

        let location = self.gateway.create_bucket(name, &region).await?;
        self.gateway.seed_baseline_acl(name).await?;
        self.gateway.put_permissive_cors(name).await?;
        self.apply_access(name, level).await?;

        info!(bucket = %name, region = %region, "bucket created");
        Ok(location)
    }

    /// Empty and delete a bucket.
    ///
    /// Follows listing continuation tokens until every key is enumerated,
    /// batch-deletes in provider-sized chunks, then deletes the bucket. The
    /// bucket delete is not attempted if object deletion fails.
    pub async fn delete_bucket(&self, name: &str) -> ServiceResult<()> {
        let mut keys = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page = self
                .gateway
                .list_objects(
                    name,
                    "",
                    None,
                    self.config.listing_page_size,
                    token.as_deref(),
                )
                .await?;
            keys.extend(page.files.into_iter().map(|object| object.key));

            match page.next_continuation_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        for chunk in keys.chunks(DELETE_BATCH_LIMIT) {
            self.gateway.delete_objects(name, chunk).await?;
        }

        self.gateway.delete_bucket(name).await?;
        info!(bucket = %name, objects = keys.len(), "bucket deleted");
        Ok(())
    }

    /// Report the region a bucket lives in, joined against the catalog.
    ///
    /// The provider reports its default region as an absent location; that
    /// maps to the configured default region here.
    pub async fn bucket_region(&self, name: &str) -> ServiceResult<BucketRegion> {
        let location = self.gateway.bucket_location(name).await?;
        let id = location.unwrap_or_else(|| self.config.default_region.clone());
        let name = regions::by_id(&id).map(|region| region.name.to_owned());
        Ok(BucketRegion { id, name })
    }
}
