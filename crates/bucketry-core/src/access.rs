//! Access classification model.
//!
//! A bucket's effective exposure is derived from three independent provider
//! settings: the public-access-block, the bucket policy, and the ACL grants.
//! The settings can disagree with each other (a "public" policy under a
//! fully enforced block, a lone public ACL grant), so classification is a
//! pure function ([`classify`]) over a snapshot of all three, and mutation
//! writes all of them together so they land in a consistent posture.
//!
//! The signal snapshot is rebuilt from fresh provider reads on every query;
//! nothing in this module (or anywhere else) caches a classification.

use serde::{Deserialize, Serialize};

use crate::error::{ServiceResult, StorageServiceError};
use crate::gateway::{AclGrant, PublicAccessFlags};

/// Well-known grantee URI for the anonymous "all users" group.
pub const ALL_USERS_GROUP_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// Well-known grantee URI for the log-delivery group.
pub const LOG_DELIVERY_GROUP_URI: &str = "http://acs.amazonaws.com/groups/s3/LogDelivery";

/// A client-requested access posture.
///
/// Carried as an enum everywhere past the boundary; the wire encoding is the
/// integer the UI sends (`0`/`1`/`2`), parsed with [`AccessLevel::try_from`].
/// Any other integer is a validation error, never a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Anonymous read via bucket policy; block disabled.
    PublicRead,
    /// Fully enforced block plus an explicit anonymous deny.
    Private,
    /// No policy, block disabled; default-private ACL posture.
    Reset,
}

impl TryFrom<i64> for AccessLevel {
    type Error = StorageServiceError;

    fn try_from(value: i64) -> ServiceResult<Self> {
        match value {
            0 => Ok(Self::PublicRead),
            1 => Ok(Self::Private),
            2 => Ok(Self::Reset),
            other => Err(StorageServiceError::InvalidAccessLevel { value: other }),
        }
    }
}

/// A bucket's derived access classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessClassification {
    /// The block is fully enforced; nothing can be public.
    Private,
    /// Nothing blocks public objects, but none is currently exposed.
    ObjectsMayBePublic,
    /// The policy or the ACL currently exposes objects.
    Public,
}

impl std::fmt::Display for AccessClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Private => "private",
            Self::ObjectsMayBePublic => "objects-may-be-public",
            Self::Public => "public",
        };
        f.write_str(label)
    }
}

/// A point-in-time snapshot of the three provider-reported access signals.
///
/// Each field comes from a separate remote read and may reflect a different
/// point in time; [`classify`] only promises to be a deterministic function
/// of the snapshot it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessSignals {
    /// A public-access-block configuration exists and was readable.
    pub block_enabled: bool,
    /// ACL-based exposure is both rejected and ignored.
    pub block_acls: bool,
    /// Policy-based exposure is both rejected and restricted.
    pub block_policy: bool,
    /// The provider judges the bucket policy public.
    pub policy_is_public: bool,
    /// An ACL grant exposes the bucket to all users.
    pub acl_is_public: bool,
}

impl AccessSignals {
    /// Build a snapshot from the raw provider reads.
    ///
    /// `flags` is `None` when the bucket has no readable public-access-block
    /// configuration, which counts as "block disabled". The two sub-block
    /// signals are conjunctions: blocking only new public ACLs while
    /// honoring existing ones (or vice versa) does not actually prevent
    /// exposure, so half-set flag pairs do not count as active.
    #[must_use]
    pub fn from_reads(
        flags: Option<PublicAccessFlags>,
        policy_is_public: bool,
        acl_is_public: bool,
    ) -> Self {
        match flags {
            Some(f) => Self {
                block_enabled: true,
                block_acls: f.block_public_acls && f.ignore_public_acls,
                block_policy: f.block_public_policy && f.restrict_public_buckets,
                policy_is_public,
                acl_is_public,
            },
            None => Self {
                block_enabled: false,
                block_acls: false,
                block_policy: false,
                policy_is_public,
                acl_is_public,
            },
        }
    }
}

/// Classify a bucket's effective exposure from a signal snapshot.
///
/// The block overrides exposure: when it is enabled with both sub-blocks
/// active, the bucket is `Private` no matter what the policy or ACL say.
/// Anything less than a fully active block leaves exposure to the two
/// public signals: `Public` if either is set, otherwise
/// `ObjectsMayBePublic` (nothing currently public, nothing preventing it).
#[must_use]
pub fn classify(signals: &AccessSignals) -> AccessClassification {
    if signals.block_enabled && signals.block_acls && signals.block_policy {
        return AccessClassification::Private;
    }

    if signals.policy_is_public || signals.acl_is_public {
        AccessClassification::Public
    } else {
        AccessClassification::ObjectsMayBePublic
    }
}

/// Whether a set of ACL grants exposes the bucket publicly: any grant to
/// the all-users group with a permission that includes `READ` or `READ_ACP`.
#[must_use]
pub fn acl_is_public(grants: &[AclGrant]) -> bool {
    grants.iter().any(|grant| {
        grant
            .grantee_uri
            .as_deref()
            .is_some_and(|uri| uri.contains("AllUsers"))
            && (grant.permission.contains("READ") || grant.permission.contains("READ_ACP"))
    })
}

/// Policy document granting anonymous `GetObject` on every key.
#[must_use]
pub fn public_read_policy(bucket: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "PublicReadGetObject",
            "Effect": "Allow",
            "Principal": "*",
            "Action": "s3:GetObject",
            "Resource": format!("arn:aws:s3:::{bucket}/*"),
        }]
    })
    .to_string()
}

/// Policy document explicitly denying anonymous `GetObject` on every key.
///
/// An explicit deny takes precedence over any stale public ACL grant, which
/// a merely absent policy would not.
#[must_use]
pub fn anonymous_deny_policy(bucket: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "DenyPublicReadGetObject",
            "Effect": "Deny",
            "Principal": "*",
            "Action": "s3:GetObject",
            "Resource": format!("arn:aws:s3:::{bucket}/*"),
        }]
    })
    .to_string()
}
