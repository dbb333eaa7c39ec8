//! Error types for the build search library
//!
//! The search core itself is infallible: an unparseable pattern or an
//! unresolved token is modeled as `None`/empty, never as an error. The only
//! fallible operation is skill-name resolution during record normalization,
//! and normalization swallows those failures per record rather than aborting
//! a whole batch.

use thiserror::Error;

/// Errors surfaced by the record normalizer's collaborators.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A skill id could not be resolved to a display name.
    #[error("skill lookup failed for id {id}: {reason}")]
    SkillLookup { id: u32, reason: String },

    /// The skill-name source itself is unavailable (table not loaded, etc.).
    #[error("skill name source unavailable: {0}")]
    SourceUnavailable(String),
}
