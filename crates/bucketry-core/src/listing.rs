//! Folder-style view over flat object listings.
//!
//! The provider returns a flat page of keys plus "common prefixes" one
//! delimiter level below the queried prefix. This module turns that page
//! into the file/folder entries the UI renders, suppresses zero-size
//! directory-marker objects, and computes the parent prefix used for
//! upward navigation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::gateway::RawListing;

/// One entry in a folder listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectEntry {
    /// A concrete object.
    #[serde(rename_all = "camelCase")]
    File {
        /// Display name: the last path segment of the key.
        name: String,
        /// Full object key.
        path: String,
        /// Size in bytes.
        size: u64,
        /// Human-readable size.
        size_display: String,
        /// Last-modified timestamp, when reported.
        last_modified: Option<DateTime<Utc>>,
        /// Virtual-hosted URL of the object.
        link: String,
    },
    /// One folder level below the queried prefix.
    #[serde(rename_all = "camelCase")]
    Folder {
        /// Display name: the last path segment of the prefix.
        name: String,
        /// Full prefix, ending in the delimiter.
        path: String,
    },
}

/// A formatted folder listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListing {
    /// The prefix this listing describes.
    pub prefix: String,
    /// Prefix of the enclosing folder; empty at the listing root.
    pub parent: String,
    /// Folder and file entries, folders last (files keep listing order).
    pub entries: Vec<ObjectEntry>,
}

/// Build the folder view for one listing page.
///
/// Zero-size objects are treated as directory markers and suppressed; the
/// key equal to the queried prefix itself (the marker for the current
/// folder) never produces an entry either way.
#[must_use]
pub fn build_listing(bucket: &str, listing: &RawListing) -> FolderListing {
    let mut entries: Vec<ObjectEntry> = listing
        .files
        .iter()
        .filter(|file| file.size != 0)
        .map(|file| ObjectEntry::File {
            name: last_segment(&file.key).to_owned(),
            path: file.key.clone(),
            size: file.size,
            size_display: format_bytes(file.size),
            last_modified: file.last_modified,
            link: object_url(bucket, &file.key),
        })
        .collect();

    entries.extend(listing.common_prefixes.iter().map(|prefix| {
        ObjectEntry::Folder {
            name: last_segment(prefix).to_owned(),
            path: prefix.clone(),
        }
    }));

    FolderListing {
        prefix: listing.prefix.clone(),
        parent: parent_prefix(&listing.prefix),
        entries,
    }
}

/// Compute the parent navigation prefix: the queried prefix with its last
/// non-empty segment stripped. Empty when the prefix has fewer than two
/// non-empty segments (the listing root).
#[must_use]
pub fn parent_prefix(prefix: &str) -> String {
    let segments: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return String::new();
    }

    let mut parent = segments[..segments.len() - 1].join("/");
    parent.push('/');
    parent
}

/// Render a byte count with at most one decimal place.
#[must_use]
pub fn format_bytes(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

    if size == 0 {
        return "0 B".to_owned();
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.1}");
    let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);
    format!("{rendered} {}", UNITS[unit])
}

/// The last non-empty `/`-separated segment of a key or prefix.
fn last_segment(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(path)
}

/// Virtual-hosted URL for an object.
fn object_url(bucket: &str, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}
