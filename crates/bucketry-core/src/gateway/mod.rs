//! Storage gateway contract.
//!
//! [`StorageGateway`] is the capability through which every component talks
//! to the object-storage provider. Consumers take it as a generic parameter,
//! so the AWS implementation ([`aws::AwsStorageGateway`]) can be replaced by
//! an in-memory fake in tests. Each method is a single remote call; the
//! gateway performs no caching and no retries of its own (the SDK's retry
//! layer is configuration of the client, not logic here).

pub mod aws;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ServiceResult;

/// One bucket row from a list-buckets call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// Creation timestamp, when the provider reports one.
    pub creation_date: Option<DateTime<Utc>>,
}

/// The result of a list-buckets call.
#[derive(Debug, Clone)]
pub struct BucketList {
    /// Display name of the owning account, when reported.
    pub owner_display_name: Option<String>,
    /// The buckets owned by the account.
    pub buckets: Vec<BucketSummary>,
}

/// Outcome of an existence check against a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketExistence {
    /// The bucket exists and is accessible.
    Exists,
    /// The bucket does not exist; safe to create.
    NotFound,
    /// The bucket exists but the provider denies access to it.
    Forbidden,
}

/// A single object row from a flat listing.
#[derive(Debug, Clone)]
pub struct RawObject {
    /// Full object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last-modified timestamp, when reported.
    pub last_modified: Option<DateTime<Utc>>,
}

/// One page of a flat key-prefix listing.
#[derive(Debug, Clone)]
pub struct RawListing {
    /// The prefix the listing was issued for.
    pub prefix: String,
    /// Objects under the prefix.
    pub files: Vec<RawObject>,
    /// Common prefixes one delimiter level below the queried prefix.
    pub common_prefixes: Vec<String>,
    /// Continuation token for the next page, if the listing was truncated.
    pub next_continuation_token: Option<String>,
}

/// A single ACL grant as reported by the provider.
#[derive(Debug, Clone)]
pub struct AclGrant {
    /// Grantee group URI, when the grantee is a well-known group.
    pub grantee_uri: Option<String>,
    /// The granted permission (e.g. `READ`, `FULL_CONTROL`).
    pub permission: String,
}

/// The four public-access-block sub-flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublicAccessFlags {
    /// Reject new public ACLs.
    pub block_public_acls: bool,
    /// Ignore existing public ACLs.
    pub ignore_public_acls: bool,
    /// Reject new public bucket policies.
    pub block_public_policy: bool,
    /// Restrict access for buckets with public policies.
    pub restrict_public_buckets: bool,
}

impl PublicAccessFlags {
    /// All four sub-flags on: the fully enforced block.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: true,
            restrict_public_buckets: true,
        }
    }

    /// All four sub-flags off.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// A presigned upload the client can perform without credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    /// The signed URL to send the upload to.
    pub url: String,
    /// HTTP method the client must use.
    pub method: String,
    /// Headers that must accompany the upload for the signature to hold.
    pub headers: Vec<(String, String)>,
    /// Seconds until the signature expires.
    pub expires_in_secs: u64,
}

/// Result of a server-side object upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectUpload {
    /// The bucket written to.
    pub bucket: String,
    /// The key written.
    pub key: String,
    /// Entity tag reported by the provider.
    pub etag: Option<String>,
    /// Virtual-hosted URL of the uploaded object.
    pub location: String,
}

/// Remote operations against the object-storage provider.
///
/// Every method maps to exactly one provider request/response pair. Read
/// methods used by the access resolver return their raw outcome; the
/// fail-safe degradation of unreadable signals is the resolver's decision,
/// not the gateway's.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// List all buckets owned by the account.
    async fn list_buckets(&self) -> ServiceResult<BucketList>;

    /// Check whether a bucket exists and is accessible.
    async fn bucket_existence(&self, bucket: &str) -> ServiceResult<BucketExistence>;

    /// Create a bucket in the given region, returning its location.
    async fn create_bucket(&self, bucket: &str, region: &str) -> ServiceResult<String>;

    /// Delete an (empty) bucket.
    async fn delete_bucket(&self, bucket: &str) -> ServiceResult<()>;

    /// Report the region a bucket lives in; `None` means the provider's
    /// default region.
    async fn bucket_location(&self, bucket: &str) -> ServiceResult<Option<String>>;

    /// List one page of objects under a prefix.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<&str>,
        max_keys: i32,
        continuation_token: Option<&str>,
    ) -> ServiceResult<RawListing>;

    /// Batch-delete the given keys. Callers must keep batches within the
    /// provider's per-request limit.
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> ServiceResult<()>;

    /// Reset the bucket ACL to the baseline posture: owner `FULL_CONTROL`
    /// plus log-delivery `WRITE`/`READ_ACP`.
    async fn seed_baseline_acl(&self, bucket: &str) -> ServiceResult<()>;

    /// Read the bucket's ACL grants.
    async fn acl_grants(&self, bucket: &str) -> ServiceResult<Vec<AclGrant>>;

    /// The provider's own verdict on whether the bucket policy is public.
    /// A bucket without a policy reports `false`.
    async fn policy_is_public(&self, bucket: &str) -> ServiceResult<bool>;

    /// Install a bucket policy document.
    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> ServiceResult<()>;

    /// Remove the bucket policy entirely.
    async fn delete_bucket_policy(&self, bucket: &str) -> ServiceResult<()>;

    /// Read the public-access-block configuration; `None` when the bucket
    /// has never been configured with one.
    async fn public_access_block(&self, bucket: &str) -> ServiceResult<Option<PublicAccessFlags>>;

    /// Write the public-access-block configuration.
    async fn put_public_access_block(
        &self,
        bucket: &str,
        flags: PublicAccessFlags,
    ) -> ServiceResult<()>;

    /// Install the permissive-GET CORS rule used for UI downloads.
    async fn put_permissive_cors(&self, bucket: &str) -> ServiceResult<()>;

    /// Generate a presigned upload for a key.
    async fn presign_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<&str>,
        expires_in: Duration,
    ) -> ServiceResult<PresignedUpload>;

    /// Upload an object body on the client's behalf.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> ServiceResult<ObjectUpload>;
}
