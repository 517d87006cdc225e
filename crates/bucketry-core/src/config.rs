//! Application configuration.
//!
//! Provides [`AppConfig`] for configuring the Bucketry service. Values are
//! loaded from environment variables with sensible defaults; AWS credentials
//! themselves are resolved by the SDK's own provider chain and never pass
//! through this struct.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Bucketry service configuration.
///
/// # Examples
///
/// ```
/// use bucketry_core::config::AppConfig;
///
/// let config = AppConfig::default();
/// assert_eq!(config.listen, "0.0.0.0:8080");
/// assert_eq!(config.default_region, "us-east-1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Bind address for the HTTP server (e.g. `"0.0.0.0:8080"`).
    #[builder(default = String::from("0.0.0.0:8080"))]
    pub listen: String,

    /// Region used for buckets created without an explicit region.
    #[builder(default = String::from("us-east-1"))]
    pub default_region: String,

    /// Maximum keys requested per listing page from the provider.
    #[builder(default = 1000)]
    pub listing_page_size: i32,

    /// Lifetime of generated presigned upload URLs, in seconds.
    #[builder(default = 900)]
    pub presign_expiry_secs: u64,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: String::from("0.0.0.0:8080"),
            default_region: String::from("us-east-1"),
            listing_page_size: 1000,
            presign_expiry_secs: 900,
            log_level: String::from("info"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `LISTEN` | `0.0.0.0:8080` |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `LISTING_PAGE_SIZE` | `1000` |
    /// | `PRESIGN_EXPIRY_SECS` | `900` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("LISTEN") {
            config.listen = v;
        }
        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Ok(v) = std::env::var("LISTING_PAGE_SIZE") {
            if let Ok(n) = v.parse::<i32>() {
                config.listing_page_size = n;
            }
        }
        if let Ok(v) = std::env::var("PRESIGN_EXPIRY_SECS") {
            if let Ok(n) = v.parse::<u64>() {
                config.presign_expiry_secs = n;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}
