//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive)
//! - Respect path-segment boundaries
//! - Produce the remainder forwarded to the backend
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - `/orders` matches `/orders`, `/orders/` and `/orders/abc`, never `/ordersx`
//! - No regex to guarantee O(n) matching

/// Matches the request path prefix on segment boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if the path falls under this prefix.
    pub fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }

    /// Remove the prefix from `path`.
    ///
    /// Returns the remainder (possibly empty, otherwise starting with `/`),
    /// or `None` if the path is not under this prefix.
    pub fn strip<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}
