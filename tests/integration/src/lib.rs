//! Integration tests for the Bucketry server.
//!
//! These tests require a running server (with provider credentials that can
//! create and delete buckets) at `localhost:8080`. They are marked
//! `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p bucketry-integration -- --ignored
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL for the server.
#[must_use]
pub fn base_url() -> String {
    std::env::var("BUCKETRY_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Create a configured HTTP client.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket with the given access level and return its name.
/// Caller is responsible for cleanup.
pub async fn create_test_bucket(client: &reqwest::Client, prefix: &str, access: i64) -> String {
    let name = test_bucket_name(prefix);
    let response = client
        .post(format!("{}/buckets", base_url()))
        .json(&serde_json::json!({"name": name, "access": access}))
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
    assert_eq!(response.status(), 201, "create bucket {name}");
    name
}

/// Delete a bucket, ignoring failures (it may already be gone).
pub async fn cleanup_bucket(client: &reqwest::Client, bucket: &str) {
    let _ = client
        .delete(format!("{}/buckets/{bucket}", base_url()))
        .send()
        .await;
}

mod test_access;
mod test_buckets;
mod test_objects;
