//! Domain error types.
//!
//! Defines [`StorageServiceError`], a closed error enum covering every
//! failure the service surfaces to its boundary layer. Validation errors are
//! produced before any provider call; everything else wraps or classifies a
//! provider outcome.
//!
//! # Usage
//!
//! ```
//! use bucketry_core::error::StorageServiceError;
//!
//! let err = StorageServiceError::BucketNotFound {
//!     bucket: "my-bucket".to_owned(),
//! };
//! assert!(err.is_not_found());
//! ```

use std::fmt;

/// The specific bucket-name rule a candidate name violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Name length outside the 3-63 character range.
    Length,
    /// Characters other than lowercase letters, digits, hyphens, and dots.
    Charset,
    /// Name is shaped like an IPv4 address.
    IpAddress,
    /// Name starts with the reserved `xn--` prefix.
    Prefix,
    /// Name ends with the reserved `-s3alias` suffix.
    Suffix,
    /// First or last character is not a letter or digit.
    EdgeCharacter,
}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Length => "must be between 3 and 63 characters long",
            Self::Charset => "must only contain lowercase letters, numbers, hyphens, and dots",
            Self::IpAddress => "must not be formatted as an IP address",
            Self::Prefix => "must not start with 'xn--'",
            Self::Suffix => "must not end with '-s3alias'",
            Self::EdgeCharacter => "must start and end with a letter or number",
        };
        f.write_str(reason)
    }
}

/// Service error type.
///
/// Each variant corresponds to one of the error kinds the boundary layer
/// maps to an HTTP status: validation (400), conflict (400), forbidden
/// (403), not-found (404), and provider (500).
#[derive(Debug, thiserror::Error)]
pub enum StorageServiceError {
    // -----------------------------------------------------------------------
    // Validation errors (caught before any provider call)
    // -----------------------------------------------------------------------
    /// The proposed bucket name violates a naming rule.
    #[error("invalid bucket name '{name}': {rule}")]
    InvalidBucketName {
        /// The rejected name.
        name: String,
        /// The rule that was violated.
        rule: NameRule,
    },

    /// The requested access level is not one of the known values.
    #[error("invalid access level {value}: expected 0 (public-read), 1 (private), or 2 (reset)")]
    InvalidAccessLevel {
        /// The rejected wire value.
        value: i64,
    },

    /// A request argument is malformed.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // -----------------------------------------------------------------------
    // Not-found errors
    // -----------------------------------------------------------------------
    /// The bucket does not exist.
    #[error("the specified bucket does not exist: {bucket}")]
    BucketNotFound {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The object key does not exist.
    #[error("the specified key does not exist: {key}")]
    ObjectNotFound {
        /// The key that was not found.
        key: String,
    },

    // -----------------------------------------------------------------------
    // Conflict errors
    // -----------------------------------------------------------------------
    /// The bucket already exists (here or in another account).
    #[error("the bucket already exists: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name that is taken.
        bucket: String,
    },

    // -----------------------------------------------------------------------
    // Access errors
    // -----------------------------------------------------------------------
    /// The provider denied access to the bucket.
    #[error("access to bucket is forbidden: {bucket}")]
    Forbidden {
        /// The bucket the provider refused.
        bucket: String,
    },

    // -----------------------------------------------------------------------
    // Provider / catch-all
    // -----------------------------------------------------------------------
    /// Any other remote failure, wrapping the underlying cause.
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

impl StorageServiceError {
    /// Whether this error was produced by request validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidBucketName { .. }
                | Self::InvalidAccessLevel { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Whether this error reports a missing bucket or object.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BucketNotFound { .. } | Self::ObjectNotFound { .. }
        )
    }
}

/// Convenience result type for service operations.
pub type ServiceResult<T> = Result<T, StorageServiceError>;
