//! In-memory gateway fake for unit tests.
//!
//! Simulates just enough provider behavior for the resolver, mutator, and
//! lifecycle tests: per-bucket policy / public-access-block / ACL state,
//! paginated listings, call recording for ordering assertions, and
//! per-method failure injection.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::access::{ALL_USERS_GROUP_URI, LOG_DELIVERY_GROUP_URI};
use crate::error::{ServiceResult, StorageServiceError};
use crate::gateway::{
    AclGrant, BucketExistence, BucketList, BucketSummary, ObjectUpload, PresignedUpload,
    PublicAccessFlags, RawListing, RawObject, StorageGateway,
};

/// Per-bucket provider state.
#[derive(Debug, Default, Clone)]
pub(crate) struct FakeBucket {
    pub region: Option<String>,
    pub objects: Vec<RawObject>,
    pub policy: Option<String>,
    pub public_access_block: Option<PublicAccessFlags>,
    pub grants: Vec<AclGrant>,
    pub cors_seeded: bool,
    pub forbidden: bool,
}

#[derive(Debug, Default)]
struct FakeState {
    buckets: BTreeMap<String, FakeBucket>,
    calls: Vec<String>,
    fail_on: HashSet<&'static str>,
}

/// An in-memory [`StorageGateway`].
#[derive(Debug, Default)]
pub(crate) struct FakeGateway {
    state: Mutex<FakeState>,
    /// Listing page size; `None` returns everything in one page.
    pub page_size: Option<usize>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(self, name: &str, bucket: FakeBucket) -> Self {
        self.state
            .lock()
            .expect("fake state")
            .buckets
            .insert(name.to_owned(), bucket);
        self
    }

    pub fn fail_on(self, method: &'static str) -> Self {
        self.state.lock().expect("fake state").fail_on.insert(method);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().expect("fake state").calls.clone()
    }

    pub fn bucket(&self, name: &str) -> Option<FakeBucket> {
        self.state
            .lock()
            .expect("fake state")
            .buckets
            .get(name)
            .cloned()
    }

    fn check(&self, method: &'static str, detail: &str) -> ServiceResult<()> {
        let mut state = self.state.lock().expect("fake state");
        state.calls.push(format!("{method}:{detail}"));
        if state.fail_on.contains(method) {
            return Err(StorageServiceError::Provider(anyhow::anyhow!(
                "injected failure in {method}"
            )));
        }
        Ok(())
    }

    fn with_bucket_state<T>(
        &self,
        bucket: &str,
        f: impl FnOnce(&mut FakeBucket) -> T,
    ) -> ServiceResult<T> {
        let mut state = self.state.lock().expect("fake state");
        state
            .buckets
            .get_mut(bucket)
            .map(f)
            .ok_or_else(|| StorageServiceError::BucketNotFound {
                bucket: bucket.to_owned(),
            })
    }
}

/// Baseline grants as the real gateway would seed them.
fn baseline_grants() -> Vec<AclGrant> {
    vec![
        AclGrant {
            grantee_uri: None,
            permission: "FULL_CONTROL".to_owned(),
        },
        AclGrant {
            grantee_uri: Some(LOG_DELIVERY_GROUP_URI.to_owned()),
            permission: "WRITE".to_owned(),
        },
        AclGrant {
            grantee_uri: Some(LOG_DELIVERY_GROUP_URI.to_owned()),
            permission: "READ_ACP".to_owned(),
        },
    ]
}

/// A public-read grant for seeding pre-existing exposure in tests.
pub(crate) fn public_read_grant() -> AclGrant {
    AclGrant {
        grantee_uri: Some(ALL_USERS_GROUP_URI.to_owned()),
        permission: "READ".to_owned(),
    }
}

#[async_trait]
impl StorageGateway for FakeGateway {
    async fn list_buckets(&self) -> ServiceResult<BucketList> {
        self.check("list_buckets", "")?;
        let state = self.state.lock().expect("fake state");
        Ok(BucketList {
            owner_display_name: Some("fake-owner".to_owned()),
            buckets: state
                .buckets
                .keys()
                .map(|name| BucketSummary {
                    name: name.clone(),
                    creation_date: None,
                })
                .collect(),
        })
    }

    async fn bucket_existence(&self, bucket: &str) -> ServiceResult<BucketExistence> {
        self.check("bucket_existence", bucket)?;
        let state = self.state.lock().expect("fake state");
        Ok(match state.buckets.get(bucket) {
            Some(b) if b.forbidden => BucketExistence::Forbidden,
            Some(_) => BucketExistence::Exists,
            None => BucketExistence::NotFound,
        })
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> ServiceResult<String> {
        self.check("create_bucket", bucket)?;
        let mut state = self.state.lock().expect("fake state");
        if state.buckets.contains_key(bucket) {
            return Err(StorageServiceError::BucketAlreadyExists {
                bucket: bucket.to_owned(),
            });
        }
        state.buckets.insert(
            bucket.to_owned(),
            FakeBucket {
                region: Some(region.to_owned()),
                ..FakeBucket::default()
            },
        );
        Ok(format!("/{bucket}"))
    }

    async fn delete_bucket(&self, bucket: &str) -> ServiceResult<()> {
        self.check("delete_bucket", bucket)?;
        let mut state = self.state.lock().expect("fake state");
        state
            .buckets
            .remove(bucket)
            .map(|_| ())
            .ok_or_else(|| StorageServiceError::BucketNotFound {
                bucket: bucket.to_owned(),
            })
    }

    async fn bucket_location(&self, bucket: &str) -> ServiceResult<Option<String>> {
        self.check("bucket_location", bucket)?;
        self.with_bucket_state(bucket, |b| b.region.clone())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        _delimiter: Option<&str>,
        _max_keys: i32,
        continuation_token: Option<&str>,
    ) -> ServiceResult<RawListing> {
        self.check("list_objects", bucket)?;
        let objects = self.with_bucket_state(bucket, |b| b.objects.clone())?;

        let matching: Vec<RawObject> = objects
            .into_iter()
            .filter(|o| o.key.starts_with(prefix))
            .collect();

        let page = self.page_size.unwrap_or(usize::MAX);
        let offset: usize = continuation_token.map_or(0, |t| t.parse().unwrap_or(0));
        let end = matching.len().min(offset.saturating_add(page));
        let next = (end < matching.len()).then(|| end.to_string());

        Ok(RawListing {
            prefix: prefix.to_owned(),
            files: matching[offset.min(end)..end].to_vec(),
            common_prefixes: Vec::new(),
            next_continuation_token: next,
        })
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> ServiceResult<()> {
        self.check("delete_objects", &format!("{bucket}:{}", keys.len()))?;
        self.with_bucket_state(bucket, |b| {
            b.objects.retain(|o| !keys.contains(&o.key));
        })
    }

    async fn seed_baseline_acl(&self, bucket: &str) -> ServiceResult<()> {
        self.check("seed_baseline_acl", bucket)?;
        self.with_bucket_state(bucket, |b| {
            b.grants = baseline_grants();
        })
    }

    async fn acl_grants(&self, bucket: &str) -> ServiceResult<Vec<AclGrant>> {
        self.check("acl_grants", bucket)?;
        self.with_bucket_state(bucket, |b| b.grants.clone())
    }

    async fn policy_is_public(&self, bucket: &str) -> ServiceResult<bool> {
        self.check("policy_is_public", bucket)?;
        self.with_bucket_state(bucket, |b| {
            // A policy is public when it allows the anonymous principal.
            b.policy
                .as_deref()
                .and_then(|p| serde_json::from_str::<serde_json::Value>(p).ok())
                .is_some_and(|doc| {
                    doc["Statement"]
                        .as_array()
                        .is_some_and(|statements| {
                            statements.iter().any(|s| {
                                s["Effect"] == "Allow" && s["Principal"] == "*"
                            })
                        })
                })
        })
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> ServiceResult<()> {
        self.check("put_bucket_policy", bucket)?;
        self.with_bucket_state(bucket, |b| {
            b.policy = Some(policy.to_owned());
        })
    }

    async fn delete_bucket_policy(&self, bucket: &str) -> ServiceResult<()> {
        self.check("delete_bucket_policy", bucket)?;
        self.with_bucket_state(bucket, |b| {
            b.policy = None;
        })
    }

    async fn public_access_block(&self, bucket: &str) -> ServiceResult<Option<PublicAccessFlags>> {
        self.check("public_access_block", bucket)?;
        self.with_bucket_state(bucket, |b| b.public_access_block)
    }

    async fn put_public_access_block(
        &self,
        bucket: &str,
        flags: PublicAccessFlags,
    ) -> ServiceResult<()> {
        self.check("put_public_access_block", bucket)?;
        self.with_bucket_state(bucket, |b| {
            b.public_access_block = Some(flags);
        })
    }

    async fn put_permissive_cors(&self, bucket: &str) -> ServiceResult<()> {
        self.check("put_permissive_cors", bucket)?;
        self.with_bucket_state(bucket, |b| {
            b.cors_seeded = true;
        })
    }

    async fn presign_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<&str>,
        expires_in: Duration,
    ) -> ServiceResult<PresignedUpload> {
        self.check("presign_upload", &format!("{bucket}/{key}"))?;
        Ok(PresignedUpload {
            url: format!("https://{bucket}.example/{key}?signed"),
            method: "PUT".to_owned(),
            headers: content_type
                .map(|ct| ("content-type".to_owned(), ct.to_owned()))
                .into_iter()
                .collect(),
            expires_in_secs: expires_in.as_secs(),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        _content_type: Option<&str>,
    ) -> ServiceResult<ObjectUpload> {
        self.check("put_object", &format!("{bucket}/{key}"))?;
        self.with_bucket_state(bucket, |b| {
            b.objects.push(RawObject {
                key: key.to_owned(),
                size: body.len() as u64,
                last_modified: None,
            });
        })?;
        Ok(ObjectUpload {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            etag: Some("\"fake-etag\"".to_owned()),
            location: format!("https://{bucket}.example/{key}"),
        })
    }
}
