//! Scoring and result accumulation
//!
//! Tier weights are fixed per tier (no per-hit signal mixing): a tag hit
//! outranks a profession hit outranks a skill hit outranks a fuzzy name
//! hit. The accumulator enforces the dedup invariant — at most one entry
//! per record per query — by keeping the best score and unioning matched
//! fields across tiers.

use crate::normalize::SearchableRecord;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Per-tier score weights.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Tag tier, the strongest signal.
    pub tag: f64,
    /// Single-profession and pattern tiers.
    pub profession: f64,
    /// Premium added on top of `profession` for a full combo pattern.
    pub full_pattern_bonus: f64,
    /// Skill-name substring tier.
    pub skill: f64,
    /// Ceiling for the fuzzy name tier; scaled down by match distance.
    pub name: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            tag: 100.0,
            profession: 80.0,
            full_pattern_bonus: 15.0,
            skill: 60.0,
            name: 40.0,
        }
    }
}

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    None,
    Tag,
    Profession,
    Skill,
    Name,
}

/// Which record fields a query touched, for "matched on ..." framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Tag,
    Profession,
    Skill,
    Name,
}

/// One scored result.
#[derive(Debug, Clone, Serialize)]
pub struct BuildMatch {
    pub record: SearchableRecord,
    pub score: f64,
    pub kind: MatchKind,
    pub matched_fields: BTreeSet<MatchedField>,
    pub matched_in_variant: bool,
}

#[derive(Debug)]
struct Pending {
    score: f64,
    kind: MatchKind,
    fields: BTreeSet<MatchedField>,
    in_variant: bool,
}

/// Accumulates per-record results across tiers, first-touch ordered so that
/// score ties resolve deterministically by candidate order.
#[derive(Debug, Default)]
pub(crate) struct ResultSet {
    order: Vec<usize>,
    entries: HashMap<usize, Pending>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    /// Record a tier hit. The matched field always joins the set; the
    /// higher score (and its tier) wins.
    pub fn add(
        &mut self,
        pos: usize,
        score: f64,
        kind: MatchKind,
        field: MatchedField,
        in_variant: bool,
    ) {
        match self.entries.get_mut(&pos) {
            Some(entry) => {
                entry.fields.insert(field);
                entry.in_variant |= in_variant;
                if score > entry.score {
                    entry.score = score;
                    entry.kind = kind;
                }
            }
            None => {
                self.order.push(pos);
                self.entries.insert(
                    pos,
                    Pending {
                        score,
                        kind,
                        fields: [field].into_iter().collect(),
                        in_variant,
                    },
                );
            }
        }
    }

    /// Record a hit only when it improves on the existing score (fuzzy
    /// merges must not dilute stronger tier hits).
    pub fn add_if_better(&mut self, pos: usize, score: f64, kind: MatchKind, field: MatchedField) {
        match self.entries.get_mut(&pos) {
            Some(entry) if score <= entry.score => {}
            Some(entry) => {
                entry.score = score;
                entry.kind = kind;
                entry.fields.insert(field);
            }
            None => self.add(pos, score, kind, field, false),
        }
    }

    /// Flatten into results: stable score-descending order (ties keep
    /// first-touch order), truncated to `cap`. Returns the pre-truncation
    /// total.
    pub fn finalize(self, records: &[SearchableRecord], cap: usize) -> (Vec<BuildMatch>, usize) {
        let mut entries = self.entries;
        let mut matches: Vec<BuildMatch> = self
            .order
            .iter()
            .filter_map(|pos| entries.remove(pos).map(|p| (pos, p)))
            .map(|(pos, pending)| BuildMatch {
                record: records[*pos].clone(),
                score: pending.score,
                kind: pending.kind,
                matched_fields: pending.fields,
                matched_in_variant: pending.in_variant,
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total = matches.len();
        matches.truncate(cap);
        (matches, total)
    }
}
