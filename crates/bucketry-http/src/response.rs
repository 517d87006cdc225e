//! JSON envelope shaping and error-to-status mapping.
//!
//! Every response carries the uniform envelope
//! `{"status": <code>, "success": <bool>, ...}`; successes splice their
//! payload fields into the envelope, failures carry a `message`.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use serde_json::{Value, json};
use tracing::{debug, error};

use bucketry_core::StorageServiceError;

/// Response body type used across the HTTP layer.
pub type ApiBody = Full<Bytes>;

/// Build a success envelope with the given payload fields spliced in.
#[must_use]
pub fn success(status: StatusCode, fields: Value) -> http::Response<ApiBody> {
    let mut body = serde_json::Map::new();
    body.insert("status".to_owned(), json!(status.as_u16()));
    body.insert("success".to_owned(), json!(true));
    if let Value::Object(extra) = fields {
        body.extend(extra);
    }
    json_response(status, &Value::Object(body))
}

/// Build a failure envelope carrying a message.
#[must_use]
pub fn failure(status: StatusCode, message: &str) -> http::Response<ApiBody> {
    let body = json!({
        "status": status.as_u16(),
        "success": false,
        "message": message,
    });
    json_response(status, &body)
}

/// Build an empty-bodied response (used for 204 listings).
#[must_use]
pub fn empty(status: StatusCode) -> http::Response<ApiBody> {
    http::Response::builder()
        .status(status)
        .body(ApiBody::default())
        .unwrap_or_default()
}

/// Map a domain error onto its HTTP status code.
#[must_use]
pub fn status_for(err: &StorageServiceError) -> StatusCode {
    match err {
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        StorageServiceError::BucketAlreadyExists { .. } => StatusCode::BAD_REQUEST,
        StorageServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        StorageServiceError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a domain error as a failure envelope.
pub fn error_to_response(err: &StorageServiceError, request_id: &str) -> http::Response<ApiBody> {
    let status = status_for(err);

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(request_id, error = %err, "request failed");
    } else {
        debug!(request_id, error = %err, status = status.as_u16(), "request rejected");
    }

    failure(status, &err.to_string())
}

/// Serialize a JSON value into a response with the given status.
fn json_response(status: StatusCode, body: &Value) -> http::Response<ApiBody> {
    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(
            serde_json::to_vec(body).unwrap_or_default(),
        )))
        .unwrap_or_default()
}
