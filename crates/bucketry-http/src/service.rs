//! The hyper `Service` tying routing, dispatch, and response shaping
//! together.
//!
//! Request lifecycle:
//!
//! 1. Request id assignment
//! 2. CORS preflight interception (`OPTIONS`)
//! 3. Route resolution
//! 4. Request body collection
//! 5. Dispatch to [`ApiHandler`]
//! 6. Common response headers (`x-request-id`, `Server`, CORS)

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use bucketry_core::BucketryService;
use bucketry_core::gateway::StorageGateway;

use crate::handlers::ApiHandler;
use crate::response::{ApiBody, failure};
use crate::router::{parse_query, resolve};

/// The Bucketry HTTP service.
#[derive(Debug)]
pub struct ApiHttpService<G: StorageGateway> {
    handler: Arc<ApiHandler<G>>,
}

impl<G: StorageGateway> ApiHttpService<G> {
    /// Create the HTTP service over a shared core service.
    #[must_use]
    pub fn new(service: Arc<BucketryService<G>>) -> Self {
        Self {
            handler: Arc::new(ApiHandler::new(service)),
        }
    }
}

impl<G: StorageGateway> Clone for ApiHttpService<G> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<G: StorageGateway + 'static> Service<http::Request<Incoming>> for ApiHttpService<G> {
    type Response = http::Response<ApiBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(req, handler.as_ref(), &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process one request through routing, body collection, and dispatch.
async fn process_request<G: StorageGateway>(
    req: http::Request<Incoming>,
    handler: &ApiHandler<G>,
    request_id: &str,
) -> http::Response<ApiBody> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing request");

    if method == http::Method::OPTIONS {
        return cors_preflight_response();
    }

    let Some(route) = resolve(&method, uri.path()) else {
        warn!(%method, %uri, request_id, "no route matched");
        return failure(http::StatusCode::NOT_FOUND, "resource not found");
    };

    let query = parse_query(uri.query().unwrap_or(""));

    let (parts, incoming) = req.into_parts();
    let body = match incoming.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            error!(error = %err, request_id, "failed to read request body");
            return failure(
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read request body",
            );
        }
    };

    info!(?route, request_id, "dispatching request");
    handler
        .dispatch(route, &query, &parts.headers, body, request_id)
        .await
}

/// Produce a CORS preflight response.
fn cors_preflight_response() -> http::Response<ApiBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header(
            "Access-Control-Allow-Methods",
            "GET, PUT, POST, DELETE, OPTIONS",
        )
        .header("Access-Control-Allow-Headers", "Authorization, Content-Type")
        .header("Access-Control-Max-Age", "86400")
        .body(ApiBody::default())
        .unwrap_or_default()
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<ApiBody>,
    request_id: &str,
) -> http::Response<ApiBody> {
    let headers = response.headers_mut();

    if let Ok(value) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", value);
    }
    headers.insert(
        "Server",
        http::header::HeaderValue::from_static("Bucketry"),
    );
    headers.insert(
        "Access-Control-Allow-Origin",
        http::header::HeaderValue::from_static("*"),
    );

    response
}
