//! Bounded cache of filter-scoped fuzzy indexes
//!
//! When filters are active, fuzzy matching runs over an index rebuilt from
//! just the filtered subset so scores aren't diluted by irrelevant records.
//! Those rebuilt indexes are cached here, keyed by a canonical signature of
//! the filter combination, validated against the exact record-ID set they
//! were built from, and bounded by an LRU store. The engine's reload path
//! calls [`FilteredIndexCache::clear`].

use crate::search::filter::{BuildFilter, ClassRole, FilterMode};
use crate::search::fuzzy::NameIndex;
use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use tracing::debug;

/// How many filter combinations keep a rebuilt index alive.
pub const FILTERED_INDEX_CACHE_CAP: usize = 5;

struct CachedIndex {
    index: NameIndex,
    /// Identity of the record set the index was built from.
    ids: HashSet<String>,
}

/// LRU store of filter signature → rebuilt name index.
pub struct FilteredIndexCache {
    entries: LruCache<String, CachedIndex>,
}

impl Default for FilteredIndexCache {
    fn default() -> Self {
        Self::new(FILTERED_INDEX_CACHE_CAP)
    }
}

impl FilteredIndexCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            ),
        }
    }

    /// Fetch the index for a filter signature, rebuilding when absent or
    /// when the filtered set's identity no longer matches (size or
    /// membership changed).
    pub fn get_or_rebuild(
        &mut self,
        key: String,
        ids: HashSet<String>,
        build: impl FnOnce() -> NameIndex,
    ) -> &NameIndex {
        let valid = self.entries.get(&key).is_some_and(|e| e.ids == ids);
        if !valid {
            debug!(key = %key, records = ids.len(), "rebuilding filtered name index");
            self.entries.put(
                key.clone(),
                CachedIndex {
                    index: build(),
                    ids,
                },
            );
        }
        &self.entries.get(&key).unwrap().index
    }

    /// Drop every cached index. Called when the backing record set reloads
    /// wholesale.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Presence check that does not refresh recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.peek(key).is_some()
    }
}

/// Canonical cache key for a filter combination: sorted, deduplicated,
/// lowercased, mode-prefixed. Equal filter sets in any order produce equal
/// keys.
pub fn filter_signature(filters: &[BuildFilter], mode: FilterMode) -> String {
    let mut parts: Vec<String> = filters
        .iter()
        .map(|filter| match filter {
            BuildFilter::Profession { value, role } => {
                let role = match role {
                    ClassRole::Primary => "primary",
                    ClassRole::Secondary => "secondary",
                    ClassRole::Any => "any",
                };
                format!("prof:{}:{}", role, value.name().to_lowercase())
            }
            BuildFilter::Tag { value } => format!("tag:{}", value.to_lowercase()),
            BuildFilter::Skill { value } => format!("skill:{}", value.to_lowercase()),
        })
        .collect();
    parts.sort();
    parts.dedup();

    let mode = match mode {
        FilterMode::And => "and",
        FilterMode::Or => "or",
    };
    format!("{}|{}", mode, parts.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gw::Profession;

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn empty_index() -> NameIndex {
        NameIndex::build(std::iter::empty::<(usize, &str)>())
    }

    #[test]
    fn test_signature_order_insensitive() {
        let a = vec![
            BuildFilter::Tag {
                value: "Meta".to_string(),
            },
            BuildFilter::Profession {
                value: Profession::Warrior,
                role: ClassRole::Primary,
            },
        ];
        let b: Vec<BuildFilter> = a.iter().rev().cloned().collect();

        assert_eq!(
            filter_signature(&a, FilterMode::And),
            filter_signature(&b, FilterMode::And)
        );
        assert_eq!(
            filter_signature(&a, FilterMode::And),
            "and|prof:primary:warrior|tag:meta"
        );
    }

    #[test]
    fn test_signature_mode_distinct() {
        let filters = vec![BuildFilter::Tag {
            value: "meta".to_string(),
        }];
        assert_ne!(
            filter_signature(&filters, FilterMode::And),
            filter_signature(&filters, FilterMode::Or)
        );
    }

    #[test]
    fn test_signature_dedups() {
        let filters = vec![
            BuildFilter::Tag {
                value: "meta".to_string(),
            },
            BuildFilter::Tag {
                value: "META".to_string(),
            },
        ];
        assert_eq!(filter_signature(&filters, FilterMode::And), "and|tag:meta");
    }

    #[test]
    fn test_cache_reuses_valid_entry() {
        let mut cache = FilteredIndexCache::default();
        let mut rebuilds = 0;

        cache.get_or_rebuild("k".to_string(), ids(&["a", "b"]), || {
            rebuilds += 1;
            empty_index()
        });
        cache.get_or_rebuild("k".to_string(), ids(&["a", "b"]), || {
            rebuilds += 1;
            empty_index()
        });

        assert_eq!(rebuilds, 1);
    }

    #[test]
    fn test_cache_invalidates_on_membership_change() {
        let mut cache = FilteredIndexCache::default();
        let mut rebuilds = 0;

        cache.get_or_rebuild("k".to_string(), ids(&["a", "b"]), || {
            rebuilds += 1;
            empty_index()
        });
        // Same size, different membership
        cache.get_or_rebuild("k".to_string(), ids(&["a", "c"]), || {
            rebuilds += 1;
            empty_index()
        });

        assert_eq!(rebuilds, 2);
    }

    #[test]
    fn test_cache_lru_eviction() {
        let mut cache = FilteredIndexCache::new(2);
        cache.get_or_rebuild("k1".to_string(), ids(&["a"]), empty_index);
        cache.get_or_rebuild("k2".to_string(), ids(&["a"]), empty_index);
        // Touch k1 so k2 becomes the eviction candidate
        cache.get_or_rebuild("k1".to_string(), ids(&["a"]), empty_index);
        cache.get_or_rebuild("k3".to_string(), ids(&["a"]), empty_index);

        assert!(cache.contains("k1"));
        assert!(!cache.contains("k2"));
        assert!(cache.contains("k3"));
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = FilteredIndexCache::default();
        cache.get_or_rebuild("k".to_string(), ids(&["a"]), empty_index);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
