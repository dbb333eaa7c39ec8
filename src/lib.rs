//! buildfinder: tiered search over a Guild Wars build catalog
//!
//! An in-process search library: callers load and normalize a build
//! collection once, then issue synchronous searches per keystroke. Queries
//! run through prioritized tiers (tag, profession combo pattern, single
//! profession, skill substring, fuzzy name), results come back scored,
//! deduplicated, and capped, together with drill-down category suggestions
//! computed against the unfiltered set.
//!
//! ```no_run
//! use buildfinder::{FilterMode, SearchEngine, TagTable};
//!
//! # let records = Vec::new();
//! let mut engine = SearchEngine::new(records, TagTable::default_catalog());
//! let response = engine.search("w/mo", &[], FilterMode::And);
//! for hit in &response.results {
//!     println!("{} ({})", hit.record.name, hit.score);
//! }
//! ```

pub mod error;
pub mod gw;
pub mod normalize;
pub mod search;

pub use error::NormalizeError;
pub use gw::{Build, BuildMember, BuildSource, Profession, TagDef, TagTable};
pub use normalize::{normalize, SearchableRecord, SkillResolver};
pub use search::{
    BuildFilter, BuildMatch, CategoryKind, CategorySuggestion, ClassRole, FilterMode, MatchKind,
    MatchedField, ScoringWeights, SearchEngine, SearchResponse,
};
