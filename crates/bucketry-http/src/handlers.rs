//! Route handlers: parse the request, call the core service, shape the
//! envelope. No decision logic lives here.

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::json;

use bucketry_core::access::AccessLevel;
use bucketry_core::gateway::StorageGateway;
use bucketry_core::{BucketryService, ServiceResult, StorageServiceError, regions};

use crate::response::{ApiBody, empty, error_to_response, success};
use crate::router::{ApiRoute, query_value};

/// Body of `POST /buckets`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBucketBody {
    name: String,
    access: i64,
    region: Option<String>,
}

/// Body of `PUT /buckets/{bucket}/access`.
#[derive(Debug, Deserialize)]
struct SetAccessBody {
    access: i64,
}

/// Body of `POST /buckets/{bucket}/upload-url`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresignBody {
    key: String,
    content_type: Option<String>,
}

/// Dispatches resolved routes to the core service.
#[derive(Debug)]
pub struct ApiHandler<G: StorageGateway> {
    service: Arc<BucketryService<G>>,
}

impl<G: StorageGateway> ApiHandler<G> {
    /// Create a handler over a shared service.
    #[must_use]
    pub fn new(service: Arc<BucketryService<G>>) -> Self {
        Self { service }
    }

    /// Handle a resolved route, turning domain errors into failure
    /// envelopes.
    pub async fn dispatch(
        &self,
        route: ApiRoute,
        query: &[(String, String)],
        headers: &HeaderMap,
        body: Bytes,
        request_id: &str,
    ) -> http::Response<ApiBody> {
        match self.handle(route, query, headers, body).await {
            Ok(response) => response,
            Err(err) => error_to_response(&err, request_id),
        }
    }

    async fn handle(
        &self,
        route: ApiRoute,
        query: &[(String, String)],
        headers: &HeaderMap,
        body: Bytes,
    ) -> ServiceResult<http::Response<ApiBody>> {
        match route {
            ApiRoute::Health => Ok(success(
                StatusCode::OK,
                json!({"service": "bucketry", "state": "running"}),
            )),

            ApiRoute::ListRegions => {
                let regions = regions::all();
                Ok(success(
                    StatusCode::OK,
                    json!({"count": regions.len(), "regions": regions}),
                ))
            }

            ApiRoute::ListBuckets => {
                let list = self.service.list_buckets().await?;
                if list.buckets.is_empty() {
                    return Ok(empty(StatusCode::NO_CONTENT));
                }
                Ok(success(
                    StatusCode::OK,
                    json!({
                        "account": list.owner_display_name,
                        "count": list.buckets.len(),
                        "buckets": list.buckets,
                    }),
                ))
            }

            ApiRoute::CreateBucket => {
                let request: CreateBucketBody = parse_json(&body)?;
                let level = AccessLevel::try_from(request.access)?;
                let location = self
                    .service
                    .create_bucket(&request.name, level, request.region.as_deref())
                    .await?;
                Ok(success(
                    StatusCode::CREATED,
                    json!({"location": location, "message": "bucket created"}),
                ))
            }

            ApiRoute::DeleteBucket { bucket } => {
                self.service.delete_bucket(&bucket).await?;
                Ok(success(StatusCode::OK, json!({"message": "bucket deleted"})))
            }

            ApiRoute::GetAccess { bucket } => {
                let access = self.service.bucket_access(&bucket).await?;
                Ok(success(
                    StatusCode::OK,
                    json!({"data": {"bucket": bucket, "access": access}}),
                ))
            }

            ApiRoute::SetAccess { bucket } => {
                let request: SetAccessBody = parse_json(&body)?;
                let level = AccessLevel::try_from(request.access)?;
                self.service.set_bucket_access(&bucket, level).await?;
                Ok(success(
                    StatusCode::OK,
                    json!({"message": "bucket access updated"}),
                ))
            }

            ApiRoute::GetRegion { bucket } => {
                let region = self.service.bucket_region(&bucket).await?;
                Ok(success(
                    StatusCode::OK,
                    json!({"data": {"bucket": bucket, "region": region}}),
                ))
            }

            ApiRoute::ListObjects { bucket } => {
                let folder = query_value(query, "folder").unwrap_or("");
                let listing = self.service.list_folder(&bucket, folder).await?;
                Ok(success(
                    StatusCode::OK,
                    json!({
                        "count": listing.entries.len(),
                        "prefix": listing.prefix,
                        "parent": listing.parent,
                        "data": listing.entries,
                    }),
                ))
            }

            ApiRoute::UploadObject { bucket } => {
                let key = query_value(query, "key").ok_or_else(|| {
                    StorageServiceError::InvalidArgument {
                        message: "missing required query parameter: key".to_owned(),
                    }
                })?;
                let content_type = headers
                    .get(http::header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok());
                let upload = self
                    .service
                    .upload_object(&bucket, key, body, content_type)
                    .await?;
                Ok(success(StatusCode::CREATED, json!({"data": upload})))
            }

            ApiRoute::PresignUpload { bucket } => {
                let request: PresignBody = parse_json(&body)?;
                let presigned = self
                    .service
                    .presign_upload(&bucket, &request.key, request.content_type.as_deref())
                    .await?;
                Ok(success(StatusCode::OK, json!({"data": presigned})))
            }
        }
    }
}

/// Parse a JSON request body, mapping malformed input to a validation error.
fn parse_json<T: serde::de::DeserializeOwned>(body: &Bytes) -> ServiceResult<T> {
    serde_json::from_slice(body).map_err(|err| StorageServiceError::InvalidArgument {
        message: format!("malformed request body: {err}"),
    })
}
