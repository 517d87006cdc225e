//! Object listing and upload integration tests.

#[cfg(test)]
mod tests {
    use crate::{base_url, cleanup_bucket, client, create_test_bucket};

    async fn upload(client: &reqwest::Client, bucket: &str, key: &str, body: &'static str) {
        let response = client
            .post(format!("{}/buckets/{bucket}/objects?key={key}", base_url()))
            .header("content-type", "text/plain")
            .body(body)
            .send()
            .await
            .expect("upload");
        assert_eq!(response.status(), 201);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_upload_and_list_objects() {
        let client = client();
        let bucket = create_test_bucket(&client, "objects", 2).await;

        upload(&client, &bucket, "docs/readme.txt", "hello").await;
        upload(&client, &bucket, "docs/2024/notes.txt", "world").await;

        let response = client
            .get(format!(
                "{}/buckets/{bucket}/objects?folder=docs%2F",
                base_url()
            ))
            .send()
            .await
            .expect("list objects");
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.expect("json body");
        let entries = body["data"].as_array().expect("entries");

        let files: Vec<&str> = entries
            .iter()
            .filter(|e| e["type"] == "file")
            .filter_map(|e| e["name"].as_str())
            .collect();
        let folders: Vec<&str> = entries
            .iter()
            .filter(|e| e["type"] == "folder")
            .filter_map(|e| e["name"].as_str())
            .collect();

        assert!(files.contains(&"readme.txt"), "files: {files:?}");
        assert!(folders.contains(&"2024"), "folders: {folders:?}");
        assert_eq!(body["parent"], "");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_parent_for_nested_folder() {
        let client = client();
        let bucket = create_test_bucket(&client, "nested", 2).await;

        upload(&client, &bucket, "a/b/file.txt", "data").await;

        let response = client
            .get(format!(
                "{}/buckets/{bucket}/objects?folder=a%2Fb%2F",
                base_url()
            ))
            .send()
            .await
            .expect("list objects");
        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body["parent"], "a/");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_generate_presigned_upload() {
        let client = client();
        let bucket = create_test_bucket(&client, "presign", 2).await;

        let response = client
            .post(format!("{}/buckets/{bucket}/upload-url", base_url()))
            .json(&serde_json::json!({"key": "direct/photo.jpg", "contentType": "image/jpeg"}))
            .send()
            .await
            .expect("presign");
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body["data"]["method"], "PUT");
        assert!(
            body["data"]["url"]
                .as_str()
                .is_some_and(|url| url.contains("direct/photo.jpg"))
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_upload_without_key() {
        let client = client();
        let bucket = create_test_bucket(&client, "nokey", 2).await;

        let response = client
            .post(format!("{}/buckets/{bucket}/objects", base_url()))
            .body("data")
            .send()
            .await
            .expect("upload");
        assert_eq!(response.status(), 400);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_nonempty_bucket() {
        let client = client();
        let bucket = create_test_bucket(&client, "full", 2).await;

        upload(&client, &bucket, "one.txt", "1").await;
        upload(&client, &bucket, "two.txt", "2").await;

        let response = client
            .delete(format!("{}/buckets/{bucket}", base_url()))
            .send()
            .await
            .expect("delete bucket");
        assert_eq!(response.status(), 200);
    }
}
