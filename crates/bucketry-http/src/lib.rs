//! HTTP boundary for Bucketry.
//!
//! Routes REST requests onto the core service, shapes the uniform JSON
//! envelope, and maps the domain error taxonomy onto HTTP status codes.
//! All decision logic stays in `bucketry-core`; this crate only parses,
//! dispatches, and serializes.

pub mod handlers;
pub mod response;
pub mod router;
pub mod service;

pub use handlers::ApiHandler;
pub use service::ApiHttpService;
