//! Static region catalog.
//!
//! Maps the commercial region identifiers the UI offers to their display
//! names. The catalog is intentionally static: region metadata changes far
//! less often than this service deploys, and a remote lookup would add a
//! provider round trip to every regions request.

use serde::Serialize;

/// A region catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Region identifier (e.g. `us-east-1`).
    pub id: &'static str,
    /// Human-readable display name.
    pub name: &'static str,
}

/// All regions offered to clients, in catalog order.
const CATALOG: &[Region] = &[
    Region { id: "us-east-1", name: "US East (N. Virginia)" },
    Region { id: "us-east-2", name: "US East (Ohio)" },
    Region { id: "us-west-1", name: "US West (N. California)" },
    Region { id: "us-west-2", name: "US West (Oregon)" },
    Region { id: "ca-central-1", name: "Canada (Central)" },
    Region { id: "eu-west-1", name: "Europe (Ireland)" },
    Region { id: "eu-west-2", name: "Europe (London)" },
    Region { id: "eu-west-3", name: "Europe (Paris)" },
    Region { id: "eu-central-1", name: "Europe (Frankfurt)" },
    Region { id: "eu-north-1", name: "Europe (Stockholm)" },
    Region { id: "ap-northeast-1", name: "Asia Pacific (Tokyo)" },
    Region { id: "ap-northeast-2", name: "Asia Pacific (Seoul)" },
    Region { id: "ap-southeast-1", name: "Asia Pacific (Singapore)" },
    Region { id: "ap-southeast-2", name: "Asia Pacific (Sydney)" },
    Region { id: "ap-south-1", name: "Asia Pacific (Mumbai)" },
    Region { id: "sa-east-1", name: "South America (Sao Paulo)" },
];

/// All catalog entries.
#[must_use]
pub fn all() -> &'static [Region] {
    CATALOG
}

/// Look up a region by identifier.
#[must_use]
pub fn by_id(id: &str) -> Option<Region> {
    CATALOG.iter().copied().find(|r| r.id == id)
}
