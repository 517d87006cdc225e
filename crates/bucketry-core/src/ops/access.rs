//! Access resolution and mutation operations.

use tracing::debug;

use crate::access::{
    AccessClassification, AccessLevel, AccessSignals, acl_is_public, anonymous_deny_policy,
    classify, public_read_policy,
};
use crate::error::ServiceResult;
use crate::gateway::{PublicAccessFlags, StorageGateway};
use crate::service::BucketryService;

impl<G: StorageGateway> BucketryService<G> {
    /// Resolve a bucket's current access classification.
    ///
    /// The three signals are read fresh on every call; a prior
    /// classification is never reused after any mutation.
    pub async fn bucket_access(&self, bucket: &str) -> ServiceResult<AccessClassification> {
        self.ensure_bucket_exists(bucket).await?;

        let signals = self.read_access_signals(bucket).await;
        let classification = classify(&signals);

        debug!(
            bucket = %bucket,
            ?signals,
            %classification,
            "bucket_access resolved"
        );
        Ok(classification)
    }

    /// Apply a requested access level to an existing bucket.
    pub async fn set_bucket_access(&self, bucket: &str, level: AccessLevel) -> ServiceResult<()> {
        self.ensure_bucket_exists(bucket).await?;
        self.apply_access(bucket, level).await
    }

    /// Read the three access signals, degrading unreadable reads to their
    /// fail-safe defaults so resolution stays total.
    async fn read_access_signals(&self, bucket: &str) -> AccessSignals {
        let flags = match self.gateway.public_access_block(bucket).await {
            Ok(flags) => flags,
            Err(err) => {
                debug!(
                    bucket = %bucket,
                    error = %err,
                    "public access block unreadable, treating as disabled"
                );
                None
            }
        };

        let policy_is_public = match self.gateway.policy_is_public(bucket).await {
            Ok(public) => public,
            Err(err) => {
                debug!(
                    bucket = %bucket,
                    error = %err,
                    "policy status unreadable, treating as not public"
                );
                false
            }
        };

        let acl_public = match self.gateway.acl_grants(bucket).await {
            Ok(grants) => acl_is_public(&grants),
            Err(err) => {
                debug!(
                    bucket = %bucket,
                    error = %err,
                    "ACL unreadable, treating as not public"
                );
                false
            }
        };

        AccessSignals::from_reads(flags, policy_is_public, acl_public)
    }

    /// Issue the ordered mutation sequence for an access level.
    ///
    /// The baseline ACL is re-seeded first so the ACL signal is
    /// deterministic afterwards. Steps are individually idempotent; on a
    /// mid-sequence failure the completed steps are left in place and the
    /// error surfaces.
    pub(crate) async fn apply_access(&self, bucket: &str, level: AccessLevel) -> ServiceResult<()> {
        self.gateway.seed_baseline_acl(bucket).await?;

        match level {
            AccessLevel::PublicRead => {
                self.gateway
                    .put_public_access_block(bucket, PublicAccessFlags::disabled())
                    .await?;
                self.gateway
                    .put_bucket_policy(bucket, &public_read_policy(bucket))
                    .await?;
            }
            AccessLevel::Private => {
                self.gateway
                    .put_public_access_block(bucket, PublicAccessFlags::enabled())
                    .await?;
                self.gateway
                    .put_bucket_policy(bucket, &anonymous_deny_policy(bucket))
                    .await?;
            }
            AccessLevel::Reset => {
                self.gateway.delete_bucket_policy(bucket).await?;
                self.gateway
                    .put_public_access_block(bucket, PublicAccessFlags::disabled())
                    .await?;
            }
        }

        debug!(bucket = %bucket, ?level, "apply_access completed");
        Ok(())
    }
}
