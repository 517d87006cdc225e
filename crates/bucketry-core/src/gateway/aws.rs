//! AWS S3 implementation of the storage gateway.
//!
//! Wraps a shared [`aws_sdk_s3::Client`] and translates SDK outcomes into
//! the domain error taxonomy. The client is constructed once in the binary
//! and injected here; nothing in this module holds state beyond it.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    AccessControlPolicy, BucketLocationConstraint, CorsConfiguration, CorsRule,
    CreateBucketConfiguration, Delete, Grant, Grantee, ObjectIdentifier, Owner, Permission,
    PublicAccessBlockConfiguration, Type,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::access::LOG_DELIVERY_GROUP_URI;
use crate::error::{ServiceResult, StorageServiceError};

use super::{
    AclGrant, BucketExistence, BucketList, BucketSummary, ObjectUpload, PresignedUpload,
    PublicAccessFlags, RawListing, RawObject, StorageGateway,
};

/// Region that must not carry an explicit location constraint on creation.
const DEFAULT_PROVIDER_REGION: &str = "us-east-1";

/// Storage gateway backed by the AWS S3 SDK client.
#[derive(Debug, Clone)]
pub struct AwsStorageGateway {
    client: Client,
}

impl AwsStorageGateway {
    /// Create a gateway over an already-configured S3 client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StorageGateway for AwsStorageGateway {
    async fn list_buckets(&self) -> ServiceResult<BucketList> {
        let output = self.client.list_buckets().send().await.map_err(|err| {
            StorageServiceError::Provider(anyhow::Error::new(err).context("list_buckets failed"))
        })?;

        let buckets = output
            .buckets()
            .iter()
            .map(|bucket| BucketSummary {
                name: bucket.name().unwrap_or_default().to_owned(),
                creation_date: bucket.creation_date().and_then(to_chrono),
            })
            .collect();

        Ok(BucketList {
            owner_display_name: output
                .owner()
                .and_then(|owner| owner.display_name())
                .map(ToOwned::to_owned),
            buckets,
        })
    }

    async fn bucket_existence(&self, bucket: &str) -> ServiceResult<BucketExistence> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(BucketExistence::Exists),
            Err(err) => {
                if let SdkError::ServiceError(ctx) = &err {
                    match ctx.raw().status().as_u16() {
                        404 => return Ok(BucketExistence::NotFound),
                        403 => return Ok(BucketExistence::Forbidden),
                        _ => {}
                    }
                }
                Err(StorageServiceError::Provider(
                    anyhow::Error::new(err).context(format!("head_bucket failed for '{bucket}'")),
                ))
            }
        }
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> ServiceResult<String> {
        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 is the one region that rejects its own location constraint.
        if region != DEFAULT_PROVIDER_REGION {
            let config = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build();
            request = request.create_bucket_configuration(config);
        }

        let output = request
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "create_bucket", err))?;

        debug!(bucket = %bucket, region = %region, "create_bucket completed");
        Ok(output
            .location()
            .map_or_else(|| format!("/{bucket}"), ToOwned::to_owned))
    }

    async fn delete_bucket(&self, bucket: &str) -> ServiceResult<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "delete_bucket", err))?;

        debug!(bucket = %bucket, "delete_bucket completed");
        Ok(())
    }

    async fn bucket_location(&self, bucket: &str) -> ServiceResult<Option<String>> {
        let output = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "get_bucket_location", err))?;

        // The provider reports its default region as an absent constraint.
        Ok(output
            .location_constraint()
            .map(|constraint| constraint.as_str().to_owned())
            .filter(|region| !region.is_empty()))
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<&str>,
        max_keys: i32,
        continuation_token: Option<&str>,
    ) -> ServiceResult<RawListing> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(max_keys);
        if let Some(delimiter) = delimiter {
            request = request.delimiter(delimiter);
        }
        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let output = request
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "list_objects_v2", err))?;

        let files = output
            .contents()
            .iter()
            .map(|object| RawObject {
                key: object.key().unwrap_or_default().to_owned(),
                size: u64::try_from(object.size().unwrap_or(0)).unwrap_or(0),
                last_modified: object.last_modified().and_then(to_chrono),
            })
            .collect();

        let common_prefixes = output
            .common_prefixes()
            .iter()
            .filter_map(|common| common.prefix().map(ToOwned::to_owned))
            .collect();

        let next_continuation_token = if output.is_truncated() == Some(true) {
            output.next_continuation_token().map(ToOwned::to_owned)
        } else {
            None
        };

        Ok(RawListing {
            prefix: prefix.to_owned(),
            files,
            common_prefixes,
            next_continuation_token,
        })
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> ServiceResult<()> {
        let identifiers = keys
            .iter()
            .map(|key| {
                ObjectIdentifier::builder()
                    .key(key)
                    .build()
                    .map_err(|err| build_error("object identifier", err))
            })
            .collect::<ServiceResult<Vec<_>>>()?;

        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .quiet(true)
            .build()
            .map_err(|err| build_error("delete request", err))?;

        let output = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "delete_objects", err))?;

        let errors = output.errors();
        if let Some(first) = errors.first() {
            return Err(StorageServiceError::Provider(anyhow::anyhow!(
                "batch delete left {} keys in bucket '{bucket}' (first: {}: {})",
                errors.len(),
                first.key().unwrap_or("<unknown>"),
                first.message().unwrap_or("no message"),
            )));
        }

        debug!(bucket = %bucket, count = keys.len(), "delete_objects completed");
        Ok(())
    }

    async fn seed_baseline_acl(&self, bucket: &str) -> ServiceResult<()> {
        // The owner grant needs the canonical owner id, which only the
        // current ACL can tell us.
        let current = self
            .client
            .get_bucket_acl()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "get_bucket_acl", err))?;

        let owner = current
            .owner()
            .cloned()
            .unwrap_or_else(|| Owner::builder().build());

        let owner_grantee = Grantee::builder()
            .r#type(Type::CanonicalUser)
            .set_id(owner.id().map(ToOwned::to_owned))
            .set_display_name(owner.display_name().map(ToOwned::to_owned))
            .build()
            .map_err(|err| build_error("owner grantee", err))?;

        let log_delivery = |permission: Permission| -> ServiceResult<Grant> {
            let grantee = Grantee::builder()
                .r#type(Type::Group)
                .uri(LOG_DELIVERY_GROUP_URI)
                .build()
                .map_err(|err| build_error("log-delivery grantee", err))?;
            Ok(Grant::builder()
                .grantee(grantee)
                .permission(permission)
                .build())
        };

        let grants = vec![
            Grant::builder()
                .grantee(owner_grantee)
                .permission(Permission::FullControl)
                .build(),
            log_delivery(Permission::Write)?,
            log_delivery(Permission::ReadAcp)?,
        ];

        let policy = AccessControlPolicy::builder()
            .set_grants(Some(grants))
            .owner(owner)
            .build();

        self.client
            .put_bucket_acl()
            .bucket(bucket)
            .access_control_policy(policy)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "put_bucket_acl", err))?;

        debug!(bucket = %bucket, "seed_baseline_acl completed");
        Ok(())
    }

    async fn acl_grants(&self, bucket: &str) -> ServiceResult<Vec<AclGrant>> {
        let output = self
            .client
            .get_bucket_acl()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "get_bucket_acl", err))?;

        Ok(output
            .grants()
            .iter()
            .map(|grant| AclGrant {
                grantee_uri: grant
                    .grantee()
                    .and_then(|grantee| grantee.uri())
                    .map(ToOwned::to_owned),
                permission: grant
                    .permission()
                    .map(|permission| permission.as_str().to_owned())
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn policy_is_public(&self, bucket: &str) -> ServiceResult<bool> {
        match self
            .client
            .get_bucket_policy_status()
            .bucket(bucket)
            .send()
            .await
        {
            Ok(output) => Ok(output
                .policy_status()
                .and_then(|status| status.is_public())
                .unwrap_or(false)),
            // No policy at all is a perfectly private answer.
            Err(err) if error_code_is(&err, "NoSuchBucketPolicy") => Ok(false),
            Err(err) => Err(classify_sdk_error(bucket, "get_bucket_policy_status", err)),
        }
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> ServiceResult<()> {
        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "put_bucket_policy", err))?;

        debug!(bucket = %bucket, "put_bucket_policy completed");
        Ok(())
    }

    async fn delete_bucket_policy(&self, bucket: &str) -> ServiceResult<()> {
        self.client
            .delete_bucket_policy()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "delete_bucket_policy", err))?;

        debug!(bucket = %bucket, "delete_bucket_policy completed");
        Ok(())
    }

    async fn public_access_block(&self, bucket: &str) -> ServiceResult<Option<PublicAccessFlags>> {
        match self
            .client
            .get_public_access_block()
            .bucket(bucket)
            .send()
            .await
        {
            Ok(output) => Ok(output.public_access_block_configuration().map(|config| {
                PublicAccessFlags {
                    block_public_acls: config.block_public_acls().unwrap_or(false),
                    ignore_public_acls: config.ignore_public_acls().unwrap_or(false),
                    block_public_policy: config.block_public_policy().unwrap_or(false),
                    restrict_public_buckets: config.restrict_public_buckets().unwrap_or(false),
                }
            })),
            Err(err) if error_code_is(&err, "NoSuchPublicAccessBlockConfiguration") => Ok(None),
            Err(err) => Err(classify_sdk_error(bucket, "get_public_access_block", err)),
        }
    }

    async fn put_public_access_block(
        &self,
        bucket: &str,
        flags: PublicAccessFlags,
    ) -> ServiceResult<()> {
        let config = PublicAccessBlockConfiguration::builder()
            .block_public_acls(flags.block_public_acls)
            .ignore_public_acls(flags.ignore_public_acls)
            .block_public_policy(flags.block_public_policy)
            .restrict_public_buckets(flags.restrict_public_buckets)
            .build();

        self.client
            .put_public_access_block()
            .bucket(bucket)
            .public_access_block_configuration(config)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "put_public_access_block", err))?;

        debug!(bucket = %bucket, ?flags, "put_public_access_block completed");
        Ok(())
    }

    async fn put_permissive_cors(&self, bucket: &str) -> ServiceResult<()> {
        let rule = CorsRule::builder()
            .allowed_methods("GET")
            .allowed_methods("HEAD")
            .allowed_origins("*")
            .allowed_headers("*")
            .max_age_seconds(3000)
            .build()
            .map_err(|err| build_error("CORS rule", err))?;

        let config = CorsConfiguration::builder()
            .cors_rules(rule)
            .build()
            .map_err(|err| build_error("CORS configuration", err))?;

        self.client
            .put_bucket_cors()
            .bucket(bucket)
            .cors_configuration(config)
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "put_bucket_cors", err))?;

        debug!(bucket = %bucket, "put_permissive_cors completed");
        Ok(())
    }

    async fn presign_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<&str>,
        expires_in: Duration,
    ) -> ServiceResult<PresignedUpload> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|err| build_error("presigning config", err))?;

        let mut request = self.client.put_object().bucket(bucket).key(key);
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        let presigned = request
            .presigned(presigning)
            .await
            .map_err(|err| classify_sdk_error(bucket, "presign_upload", err))?;

        Ok(PresignedUpload {
            url: presigned.uri().to_owned(),
            method: presigned.method().to_owned(),
            headers: presigned
                .headers()
                .map(|(name, value)| (name.to_owned(), value.to_owned()))
                .collect(),
            expires_in_secs: expires_in.as_secs(),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> ServiceResult<ObjectUpload> {
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        let output = request
            .send()
            .await
            .map_err(|err| classify_sdk_error(bucket, "put_object", err))?;

        debug!(bucket = %bucket, key = %key, "put_object completed");
        Ok(ObjectUpload {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            etag: output.e_tag().map(ToOwned::to_owned),
            location: format!("https://{bucket}.s3.amazonaws.com/{key}"),
        })
    }
}

/// Convert an aws-smithy timestamp into a chrono UTC timestamp.
fn to_chrono(ts: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

/// Translate an SDK error into the domain taxonomy.
///
/// Not-found, forbidden, and already-exists outcomes become their dedicated
/// variants; everything else is wrapped as a provider error with the failing
/// action and bucket attached.
fn classify_sdk_error<E>(bucket: &str, action: &'static str, err: SdkError<E>) -> StorageServiceError
where
    E: ProvideErrorMetadata,
    SdkError<E>: std::error::Error + Send + Sync + 'static,
{
    if let SdkError::ServiceError(ctx) = &err {
        let status = ctx.raw().status().as_u16();
        let code = ctx.err().code();

        if matches!(code, Some("NoSuchBucket")) || status == 404 {
            return StorageServiceError::BucketNotFound {
                bucket: bucket.to_owned(),
            };
        }
        if matches!(code, Some("BucketAlreadyExists" | "BucketAlreadyOwnedByYou")) {
            return StorageServiceError::BucketAlreadyExists {
                bucket: bucket.to_owned(),
            };
        }
        if matches!(code, Some("AccessDenied")) || status == 403 {
            return StorageServiceError::Forbidden {
                bucket: bucket.to_owned(),
            };
        }
    }

    StorageServiceError::Provider(
        anyhow::Error::new(err).context(format!("{action} failed for bucket '{bucket}'")),
    )
}

/// Whether an SDK error carries the given service error code.
fn error_code_is<E: ProvideErrorMetadata>(err: &SdkError<E>, code: &str) -> bool {
    matches!(err, SdkError::ServiceError(ctx) if ctx.err().code() == Some(code))
}

/// Wrap a request-builder failure as a provider error.
fn build_error<E>(what: &str, err: E) -> StorageServiceError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageServiceError::Provider(anyhow::Error::new(err).context(format!("building {what}")))
}
