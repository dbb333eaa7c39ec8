//! Fuzzy name index using nucleo-matcher
//!
//! Builds a name-similarity index over build names with the Smith-Waterman
//! matcher from the nucleo-matcher crate (used in the Helix editor). Raw
//! nucleo scores are converted to a normalized distance on a 0 (exact) to
//! 1 (dissimilar) scale so the engine can map hits onto its own weight
//! range.

use crate::normalize::normalize_text;
use nucleo_matcher::{Matcher, Utf32String};
use unicode_segmentation::UnicodeSegmentation;

/// Hits farther than this distance are dropped: tolerant of typos, not
/// promiscuous.
pub const SIMILARITY_THRESHOLD: f64 = 0.4;

/// Query tokens shorter than this are ignored by the fuzzy tier.
pub const MIN_MATCH_LEN: usize = 2;

/// One indexed name. `pos` is the record's position in the set the index
/// was built from.
struct IndexEntry {
    pos: usize,
    name: Utf32String,
}

/// A fuzzy hit with its normalized distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NameHit {
    pub pos: usize,
    pub distance: f64,
}

/// Name-similarity index over a record set. Built once per set; rebuilt
/// wholesale when the set changes.
#[derive(Default)]
pub struct NameIndex {
    entries: Vec<IndexEntry>,
}

impl NameIndex {
    /// Build the index from `(position, name)` pairs.
    pub fn build<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let entries = names
            .into_iter()
            .map(|(pos, name)| IndexEntry {
                pos,
                name: Utf32String::from(normalize_text(name).to_lowercase().as_str()),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match a query against every indexed name.
    ///
    /// The query is split into words and each word is matched independently;
    /// per-entry distances average across words, which makes matching
    /// insensitive to token order ("sword warrior" finds "Warrior Sword").
    /// Hits beyond [`SIMILARITY_THRESHOLD`] are dropped; the rest come back
    /// sorted nearest-first.
    pub fn search(&self, matcher: &mut Matcher, query: &str) -> Vec<NameHit> {
        let normalized = normalize_text(query).to_lowercase();
        let tokens: Vec<Utf32String> = normalized
            .unicode_words()
            .filter(|w| w.chars().count() >= MIN_MATCH_LEN)
            .map(Utf32String::from)
            .collect();

        if tokens.is_empty() {
            return Vec::new();
        }

        // Self-match score is the per-token ceiling used to normalize
        let ideals: Vec<f64> = tokens
            .iter()
            .map(|t| {
                matcher
                    .fuzzy_match(t.slice(..), t.slice(..))
                    .map(|s| s as f64)
                    .unwrap_or(1.0)
            })
            .collect();

        let mut hits = Vec::new();
        for entry in &self.entries {
            let mut total = 0.0;
            for (token, ideal) in tokens.iter().zip(&ideals) {
                let distance = match matcher.fuzzy_match(entry.name.slice(..), token.slice(..)) {
                    Some(score) => (1.0 - score as f64 / ideal).clamp(0.0, 1.0),
                    None => 1.0,
                };
                total += distance;
            }
            let distance = total / tokens.len() as f64;
            if distance <= SIMILARITY_THRESHOLD {
                hits.push(NameHit {
                    pos: entry.pos,
                    distance,
                });
            }
        }

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.pos.cmp(&b.pos))
        });
        hits
    }
}
