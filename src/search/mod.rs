//! Tiered build search
//!
//! Query classification, per-tier matching, scoring and deduplication,
//! structured filters, and the bounded cache of filter-scoped fuzzy
//! indexes.

pub mod cache;
pub mod engine;
pub mod filter;
pub mod fuzzy;
pub mod pattern;
pub mod ranking;


pub use cache::{filter_signature, FilteredIndexCache, FILTERED_INDEX_CACHE_CAP};
pub use engine::{
    CategoryKind, CategorySuggestion, SearchEngine, SearchResponse, MIN_QUERY_LEN, RESULT_CAP,
};
pub use filter::{apply_filters, filter_matches, BuildFilter, ClassRole, FilterMode};
pub use fuzzy::{NameHit, NameIndex, MIN_MATCH_LEN, SIMILARITY_THRESHOLD};
pub use pattern::{parse_full_pattern, parse_partial_pattern, FullPattern, PartialPattern};
pub use ranking::{BuildMatch, MatchKind, MatchedField, ScoringWeights};
