//! Bucket name validation.
//!
//! Validates proposed bucket names against the provider's naming rules
//! before any remote call is made, reporting the first violated rule.

use std::net::Ipv4Addr;

use crate::error::{NameRule, ServiceResult, StorageServiceError};

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Validate a proposed bucket name.
///
/// Rules, checked in order with the first violation reported:
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Not formatted as an IPv4 address (e.g. `192.168.0.1`)
/// - Must not start with `xn--`
/// - Must not end with `-s3alias`
/// - Must start and end with a letter or number
///
/// # Errors
///
/// Returns [`StorageServiceError::InvalidBucketName`] carrying the violated
/// [`NameRule`].
///
/// # Examples
///
/// ```
/// use bucketry_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("good-name1").is_ok());
/// assert!(validate_bucket_name("My-Bucket").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> ServiceResult<()> {
    let fail = |rule: NameRule| StorageServiceError::InvalidBucketName {
        name: name.to_owned(),
        rule,
    };

    let len = name.len();
    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return Err(fail(NameRule::Length));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(fail(NameRule::Charset));
    }

    // The strict Ipv4Addr parse matches the rule exactly: four dot-separated
    // 0-255 decimal groups, leading zeros rejected.
    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(fail(NameRule::IpAddress));
    }

    if name.starts_with("xn--") {
        return Err(fail(NameRule::Prefix));
    }

    if name.ends_with("-s3alias") {
        return Err(fail(NameRule::Suffix));
    }

    let first = name.as_bytes()[0];
    let last = name.as_bytes()[len - 1];
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(fail(NameRule::EdgeCharacter));
    }

    Ok(())
}
