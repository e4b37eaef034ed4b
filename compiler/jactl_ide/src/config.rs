//! Cache configuration.

/// Placeholder the editor inserts at the caret when it parses a copy of a
/// file for completion.
pub const COMPLETION_PLACEHOLDER: &str = "IntellijIdeaRulezzz";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of files kept.
    pub capacity: usize,
    /// Texts containing this marker are materialized but never stored.
    pub uncached_marker: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            capacity: 100,
            uncached_marker: Some(COMPLETION_PLACEHOLDER.to_owned()),
        }
    }
}

impl CacheConfig {
    /// No eviction and every text cached. Mainly for tests.
    pub fn unbounded() -> Self {
        CacheConfig {
            capacity: usize::MAX,
            uncached_marker: None,
        }
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether `text` must not be stored.
    pub fn is_uncached(&self, text: &str) -> bool {
        self.uncached_marker
            .as_deref()
            .is_some_and(|marker| text.contains(marker))
    }
}
