//! Access resolution and mutation integration tests.

#[cfg(test)]
mod tests {
    use crate::{base_url, cleanup_bucket, client, create_test_bucket};

    async fn resolved_access(client: &reqwest::Client, bucket: &str) -> String {
        let response = client
            .get(format!("{}/buckets/{bucket}/access", base_url()))
            .send()
            .await
            .expect("get access");
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.expect("json body");
        body["data"]["access"]
            .as_str()
            .expect("access string")
            .to_owned()
    }

    async fn set_access(client: &reqwest::Client, bucket: &str, level: i64) {
        let response = client
            .put(format!("{}/buckets/{bucket}/access", base_url()))
            .json(&serde_json::json!({"access": level}))
            .send()
            .await
            .expect("set access");
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_resolve_public_after_level_zero() {
        let client = client();
        let bucket = create_test_bucket(&client, "pub", 0).await;

        assert_eq!(resolved_access(&client, &bucket).await, "public");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_resolve_private_after_level_one() {
        let client = client();
        let bucket = create_test_bucket(&client, "priv", 1).await;

        assert_eq!(resolved_access(&client, &bucket).await, "private");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_access_levels() {
        let client = client();
        let bucket = create_test_bucket(&client, "cycle", 2).await;

        assert_eq!(
            resolved_access(&client, &bucket).await,
            "objects-may-be-public"
        );

        set_access(&client, &bucket, 1).await;
        assert_eq!(resolved_access(&client, &bucket).await, "private");

        set_access(&client, &bucket, 0).await;
        assert_eq!(resolved_access(&client, &bucket).await, "public");

        set_access(&client, &bucket, 2).await;
        assert_eq!(
            resolved_access(&client, &bucket).await,
            "objects-may-be-public"
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_level_on_edit() {
        let client = client();
        let bucket = create_test_bucket(&client, "badedit", 2).await;

        let response = client
            .put(format!("{}/buckets/{bucket}/access", base_url()))
            .json(&serde_json::json!({"access": 5}))
            .send()
            .await
            .expect("set access");
        assert_eq!(response.status(), 400);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_missing_bucket_access() {
        let client = client();

        let response = client
            .get(format!(
                "{}/buckets/bucketry-no-such-bucket/access",
                base_url()
            ))
            .send()
            .await
            .expect("get access");
        assert_eq!(response.status(), 404);
    }
}
