//! Slash-pattern parsing
//!
//! Queries of the form `"A/B"` denote a primary/secondary profession combo.
//! A full pattern has both sides resolved (or blank, meaning "any"); a
//! partial pattern has a resolved left side and an unresolved right side the
//! user is presumably still typing.

use crate::gw::Profession;
use crate::normalize::SearchableRecord;
use serde::Serialize;

/// A fully parsed profession combo. A `None` side is a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FullPattern {
    pub primary: Option<Profession>,
    pub secondary: Option<Profession>,
}

impl FullPattern {
    /// Whether a record carries the combo: each non-wildcard side must
    /// appear in the matching role.
    pub fn matches(&self, record: &SearchableRecord) -> bool {
        let primary_ok = self
            .primary
            .map(|p| record.primary_classes.contains(&p))
            .unwrap_or(true);
        let secondary_ok = self
            .secondary
            .map(|s| record.secondary_classes.contains(&s))
            .unwrap_or(true);
        primary_ok && secondary_ok
    }

    /// Canonical combo notation, e.g. "W/Mo"; a wildcard side stays blank.
    pub fn label(&self) -> String {
        format!(
            "{}/{}",
            self.primary.map(Profession::abbrev).unwrap_or(""),
            self.secondary.map(Profession::abbrev).unwrap_or("")
        )
    }
}

/// A combo whose right side is not yet resolvable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialPattern {
    pub primary: Profession,
    pub partial_secondary: String,
}

/// Parse a query as a full slash pattern.
///
/// Rejects on zero or multiple slashes, on a bare slash, and on any
/// non-empty side that fails to resolve — an unresolvable side never
/// silently degrades to a wildcard.
pub fn parse_full_pattern(query: &str) -> Option<FullPattern> {
    let (left, right) = split_single_slash(query)?;

    if left.is_empty() && right.is_empty() {
        return None;
    }

    let primary = if left.is_empty() {
        None
    } else {
        Some(Profession::resolve(left)?)
    };
    let secondary = if right.is_empty() {
        None
    } else {
        Some(Profession::resolve(right)?)
    };

    Some(FullPattern { primary, secondary })
}

/// Parse a query as a partial slash pattern: a resolved left side and a
/// non-empty right side that does not resolve on its own. Callers try
/// [`parse_full_pattern`] first; if the right side resolved, the full parse
/// would already have succeeded.
pub fn parse_partial_pattern(query: &str) -> Option<PartialPattern> {
    let (left, right) = split_single_slash(query)?;

    if left.is_empty() || right.is_empty() {
        return None;
    }

    let primary = Profession::resolve(left)?;
    if Profession::resolve(right).is_some() {
        return None;
    }

    Some(PartialPattern {
        primary,
        partial_secondary: right.to_string(),
    })
}

/// Split on the query's slash, requiring exactly one. Sides come back
/// trimmed.
fn split_single_slash(query: &str) -> Option<(&str, &str)> {
    if query.matches('/').count() != 1 {
        return None;
    }
    let (left, right) = query.split_once('/')?;
    Some((left.trim(), right.trim()))
}
