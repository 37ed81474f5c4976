//! Web origins.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scheme, host and port of a web document, e.g. `https://lessons.example.org`.
///
/// Comparison is exact byte equality. `https://a.org` and `https://a.org/`
/// are different origins, as are `http://a.org` and `https://a.org`; message
/// authentication relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Origin(String);

impl Origin {
    /// Wrap an origin string as given.
    pub fn new(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    /// Build an origin from a location's protocol and host.
    ///
    /// `protocol` may carry the trailing colon browsers report (`"https:"`).
    pub fn from_location(protocol: &str, host: &str) -> Self {
        let scheme = protocol.strip_suffix(':').unwrap_or(protocol);
        Self(format!("{scheme}://{host}"))
    }

    /// Exact comparison against an origin reported by the platform.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }

    /// The origin string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
