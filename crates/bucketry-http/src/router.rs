//! REST route resolution.
//!
//! Maps method + path onto an [`ApiRoute`]. Path segments are
//! percent-decoded before matching so encoded bucket names round-trip.

use http::Method;
use percent_encoding::percent_decode_str;

/// The REST operations this service exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRoute {
    /// `GET /health`
    Health,
    /// `GET /regions`
    ListRegions,
    /// `GET /buckets`
    ListBuckets,
    /// `POST /buckets`
    CreateBucket,
    /// `DELETE /buckets/{bucket}`
    DeleteBucket {
        /// Target bucket.
        bucket: String,
    },
    /// `GET /buckets/{bucket}/access`
    GetAccess {
        /// Target bucket.
        bucket: String,
    },
    /// `PUT /buckets/{bucket}/access`
    SetAccess {
        /// Target bucket.
        bucket: String,
    },
    /// `GET /buckets/{bucket}/region`
    GetRegion {
        /// Target bucket.
        bucket: String,
    },
    /// `GET /buckets/{bucket}/objects`
    ListObjects {
        /// Target bucket.
        bucket: String,
    },
    /// `POST /buckets/{bucket}/objects`
    UploadObject {
        /// Target bucket.
        bucket: String,
    },
    /// `POST /buckets/{bucket}/upload-url`
    PresignUpload {
        /// Target bucket.
        bucket: String,
    },
}

/// Resolve a request line to a route, or `None` for unknown paths.
#[must_use]
pub fn resolve(method: &Method, path: &str) -> Option<ApiRoute> {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    match (method, segments.as_slice()) {
        (&Method::GET, ["health"]) => Some(ApiRoute::Health),
        (&Method::GET, ["regions"]) => Some(ApiRoute::ListRegions),
        (&Method::GET, ["buckets"]) => Some(ApiRoute::ListBuckets),
        (&Method::POST, ["buckets"]) => Some(ApiRoute::CreateBucket),
        (&Method::DELETE, ["buckets", bucket]) => Some(ApiRoute::DeleteBucket {
            bucket: (*bucket).to_owned(),
        }),
        (&Method::GET, ["buckets", bucket, "access"]) => Some(ApiRoute::GetAccess {
            bucket: (*bucket).to_owned(),
        }),
        (&Method::PUT, ["buckets", bucket, "access"]) => Some(ApiRoute::SetAccess {
            bucket: (*bucket).to_owned(),
        }),
        (&Method::GET, ["buckets", bucket, "region"]) => Some(ApiRoute::GetRegion {
            bucket: (*bucket).to_owned(),
        }),
        (&Method::GET, ["buckets", bucket, "objects"]) => Some(ApiRoute::ListObjects {
            bucket: (*bucket).to_owned(),
        }),
        (&Method::POST, ["buckets", bucket, "objects"]) => Some(ApiRoute::UploadObject {
            bucket: (*bucket).to_owned(),
        }),
        (&Method::POST, ["buckets", bucket, "upload-url"]) => Some(ApiRoute::PresignUpload {
            bucket: (*bucket).to_owned(),
        }),
        _ => None,
    }
}

/// Parse a raw query string into decoded key/value pairs.
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_segment(key), decode_segment(value))
        })
        .collect()
}

/// Look up a query parameter by name.
#[must_use]
pub fn query_value<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Percent-decode a path or query component, keeping the raw text on
/// invalid UTF-8.
fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map_or_else(|_| raw.to_owned(), |decoded| decoded.into_owned())
}
