//! Exclusion rules for system and metadata entries.

use std::collections::HashSet;

/// Decides whether a directory entry name is skipped during a scan.
///
/// Two independent predicates are composed with OR: literal membership in the
/// exclusion set, and a structural prefix match. The sentinel marker is itself
/// excluded here; its presence is tested separately on the raw listing.
#[derive(Debug, Clone)]
pub struct PathFilter {
    excluded_names: HashSet<String>,
    excluded_prefix: String,
}

impl PathFilter {
    /// Create a filter from a set of literal names and a prefix.
    ///
    /// An empty prefix disables the structural rule.
    pub fn new(
        excluded_names: impl IntoIterator<Item = impl Into<String>>,
        excluded_prefix: impl Into<String>,
    ) -> Self {
        Self {
            excluded_names: excluded_names.into_iter().map(Into::into).collect(),
            excluded_prefix: excluded_prefix.into(),
        }
    }

    /// Literal set membership.
    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.excluded_names.contains(name)
    }

    /// Structural prefix rule.
    pub fn has_excluded_prefix(&self, name: &str) -> bool {
        !self.excluded_prefix.is_empty() && name.starts_with(&self.excluded_prefix)
    }

    /// Returns true if the entry must never be visited or classified.
    pub fn should_skip(&self, name: &str) -> bool {
        self.is_excluded_name(name) || self.has_excluded_prefix(name)
    }
}
