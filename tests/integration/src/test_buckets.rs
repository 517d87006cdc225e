//! Bucket lifecycle integration tests.

#[cfg(test)]
mod tests {
    use crate::{base_url, cleanup_bucket, client, create_test_bucket, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_delete_bucket() {
        let client = client();
        let bucket = create_test_bucket(&client, "create", 2).await;

        let response = client
            .get(format!("{}/buckets", base_url()))
            .send()
            .await
            .expect("list buckets");
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.expect("json body");
        let names: Vec<&str> = body["buckets"]
            .as_array()
            .expect("buckets array")
            .iter()
            .filter_map(|b| b["name"].as_str())
            .collect();
        assert!(names.contains(&bucket.as_str()), "should contain {bucket}");

        let response = client
            .delete(format!("{}/buckets/{bucket}", base_url()))
            .send()
            .await
            .expect("delete bucket");
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_bucket_name() {
        let client = client();

        let response = client
            .post(format!("{}/buckets", base_url()))
            .json(&serde_json::json!({"name": "My-Bucket", "access": 2}))
            .send()
            .await
            .expect("create request");
        assert_eq!(response.status(), 400);

        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_access_level() {
        let client = client();
        let name = test_bucket_name("badlevel");

        let response = client
            .post(format!("{}/buckets", base_url()))
            .json(&serde_json::json!({"name": name, "access": 9}))
            .send()
            .await
            .expect("create request");
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_duplicate_bucket() {
        let client = client();
        let bucket = create_test_bucket(&client, "dup", 2).await;

        let response = client
            .post(format!("{}/buckets", base_url()))
            .json(&serde_json::json!({"name": bucket, "access": 2}))
            .send()
            .await
            .expect("duplicate create");
        assert_eq!(response.status(), 400);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_bucket_region() {
        let client = client();
        let bucket = create_test_bucket(&client, "region", 2).await;

        let response = client
            .get(format!("{}/buckets/{bucket}/region", base_url()))
            .send()
            .await
            .expect("get region");
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.expect("json body");
        assert!(body["data"]["region"]["id"].is_string());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_regions() {
        let client = client();

        let response = client
            .get(format!("{}/regions", base_url()))
            .send()
            .await
            .expect("list regions");
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.expect("json body");
        assert!(body["count"].as_u64().is_some_and(|c| c > 0));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unknown_route() {
        let client = client();

        let response = client
            .get(format!("{}/nope", base_url()))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), 404);
    }
}
