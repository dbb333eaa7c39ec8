//! Tiered search engine
//!
//! Ties together tag resolution, slash-pattern parsing, filtering, skill
//! substring matching, and fuzzy name matching into a single synchronous
//! `search` call. Tiers run in strict priority order through an explicit
//! pipeline: each tier either continues or halts the whole search, so the
//! early-exit contract is auditable in one place.

use crate::gw::{Profession, TagTable};
use crate::normalize::{normalize_text, SearchableRecord};
use crate::search::cache::{filter_signature, FilteredIndexCache};
use crate::search::filter::{apply_filters, BuildFilter, FilterMode};
use crate::search::fuzzy::NameIndex;
use crate::search::pattern::{parse_full_pattern, parse_partial_pattern};
use crate::search::ranking::{BuildMatch, MatchKind, MatchedField, ResultSet, ScoringWeights};
use nucleo_matcher::{Config, Matcher};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Queries shorter than this return an explicit empty response.
pub const MIN_QUERY_LEN: usize = 2;

/// Minimum query length for the skill substring tier.
pub const SKILL_QUERY_MIN_LEN: usize = 4;

/// How many distinct skill names a substring may plausibly mean.
pub const MAX_SENSIBLE_SKILL_MATCHES: usize = 30;

/// A substring matching more than `MAX_SENSIBLE_SKILL_MATCHES *
/// SKILL_MATCH_SLACK` distinct skill names is too generic to rank on.
pub const SKILL_MATCH_SLACK: usize = 2;

/// Maximum number of results returned per search.
pub const RESULT_CAP: usize = 50;

/// What kind of drill-down a category suggestion offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Tag,
    Profession,
}

/// A UI-facing drill-down suggestion, always counted against the
/// unfiltered record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySuggestion {
    pub kind: CategoryKind,
    pub name: String,
    pub count: usize,
}

/// The outcome of one search call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<BuildMatch>,
    pub categories: Vec<CategorySuggestion>,
    /// The tier that established the primary match.
    pub kind: MatchKind,
    /// Canonical spelling of what matched, for "you searched for X" framing.
    pub matched_value: Option<String>,
    /// Result count before truncation to [`RESULT_CAP`].
    pub total: usize,
}

impl SearchResponse {
    fn empty() -> Self {
        Self {
            results: Vec::new(),
            categories: Vec::new(),
            kind: MatchKind::None,
            matched_value: None,
            total: 0,
        }
    }
}

/// Whether a tier lets the pipeline continue or terminates the search.
enum TierFlow {
    Continue,
    Halt,
}

/// Mutable state threaded through the tier pipeline.
struct TierCx {
    /// Trimmed, NFKC-normalized, lowercased query.
    query: String,
    /// Positions of records passing the active filters.
    candidates: Vec<usize>,
    /// Canonical filter signature; `None` when no filters are active.
    signature: Option<String>,
    results: ResultSet,
    categories: Vec<CategorySuggestion>,
    kind: MatchKind,
    matched_value: Option<String>,
}

impl TierCx {
    /// Claim the primary match type. Lower tiers never overwrite a higher
    /// tier's designation.
    fn set_kind(&mut self, kind: MatchKind, value: String) {
        if self.kind == MatchKind::None {
            self.kind = kind;
            self.matched_value = Some(value);
        }
    }
}

/// In-memory tiered search over a normalized record set.
///
/// The record set and base fuzzy index are read-only snapshots replaced
/// wholesale by [`SearchEngine::reload`]; the only other mutable state is
/// the bounded filtered-index cache and the matcher's scratch buffers,
/// which is why `search` takes `&mut self`.
pub struct SearchEngine {
    records: Vec<SearchableRecord>,
    tags: TagTable,
    weights: ScoringWeights,
    matcher: Matcher,
    base_index: NameIndex,
    filtered_cache: FilteredIndexCache,
}

impl SearchEngine {
    pub fn new(records: Vec<SearchableRecord>, tags: TagTable) -> Self {
        Self::with_weights(records, tags, ScoringWeights::default())
    }

    pub fn with_weights(
        records: Vec<SearchableRecord>,
        tags: TagTable,
        weights: ScoringWeights,
    ) -> Self {
        let base_index = Self::build_index(&records);
        Self {
            records,
            tags,
            weights,
            matcher: Matcher::new(Config::DEFAULT),
            base_index,
            filtered_cache: FilteredIndexCache::default(),
        }
    }

    fn build_index(records: &[SearchableRecord]) -> NameIndex {
        NameIndex::build(
            records
                .iter()
                .enumerate()
                .map(|(pos, record)| (pos, record.name.as_str())),
        )
    }

    pub fn records(&self) -> &[SearchableRecord] {
        &self.records
    }

    /// Replace the record set wholesale: rebuilds the base index and drops
    /// every cached filtered index.
    pub fn reload(&mut self, records: Vec<SearchableRecord>) {
        debug!(count = records.len(), "reloading record set");
        self.base_index = Self::build_index(&records);
        self.records = records;
        self.filtered_cache.clear();
    }

    /// Explicitly drop the filtered-index cache.
    pub fn clear_cache(&mut self) {
        self.filtered_cache.clear();
    }

    /// Run a search: narrow by filters, then rank within the narrowed pool.
    ///
    /// Category suggestions are computed against the unfiltered set so they
    /// stay discoverable even when the active filters currently yield
    /// nothing.
    pub fn search(
        &mut self,
        query: &str,
        filters: &[BuildFilter],
        mode: FilterMode,
    ) -> SearchResponse {
        let query = normalize_text(query).to_lowercase();
        let candidates = apply_filters(&self.records, filters, mode, &self.tags);

        if query.is_empty() {
            // Browse mode: the filtered set verbatim, untyped
            let total = candidates.len();
            let results = candidates
                .iter()
                .take(RESULT_CAP)
                .map(|&pos| BuildMatch {
                    record: self.records[pos].clone(),
                    score: 0.0,
                    kind: MatchKind::None,
                    matched_fields: BTreeSet::new(),
                    matched_in_variant: false,
                })
                .collect();
            return SearchResponse {
                results,
                categories: Vec::new(),
                kind: MatchKind::None,
                matched_value: None,
                total,
            };
        }

        if query.chars().count() < MIN_QUERY_LEN {
            // Too short to mean anything; distinct from the empty query
            return SearchResponse::empty();
        }

        let signature = (!filters.is_empty()).then(|| filter_signature(filters, mode));
        let mut cx = TierCx {
            query,
            candidates,
            signature,
            results: ResultSet::new(),
            categories: Vec::new(),
            kind: MatchKind::None,
            matched_value: None,
        };

        const TIERS: &[fn(&mut SearchEngine, &mut TierCx) -> TierFlow] = &[
            SearchEngine::tag_tier,
            SearchEngine::full_pattern_tier,
            SearchEngine::partial_pattern_tier,
            SearchEngine::profession_tier,
            SearchEngine::skill_tier,
            SearchEngine::name_tier,
        ];

        for tier in TIERS {
            if let TierFlow::Halt = tier(self, &mut cx) {
                break;
            }
        }

        let TierCx {
            results,
            categories,
            kind,
            matched_value,
            ..
        } = cx;
        let (results, total) = results.finalize(&self.records, RESULT_CAP);
        SearchResponse {
            results,
            categories,
            kind,
            matched_value,
            total,
        }
    }

    /// Tier 1: tag match. A leading `#` marks deliberate category intent
    /// and enables fuzzy (prefix) tag resolution plus autocomplete
    /// suggestions.
    fn tag_tier(&mut self, cx: &mut TierCx) -> TierFlow {
        let (token, marker) = match cx.query.strip_prefix('#') {
            Some(rest) => (rest.trim().to_string(), true),
            None => (cx.query.clone(), false),
        };
        if token.is_empty() {
            return TierFlow::Continue;
        }

        let resolved = self
            .tags
            .resolve(&token, marker)
            .map(|tag| (tag.key.clone(), tag.label.clone()));

        if let Some((key, label)) = &resolved {
            cx.set_kind(MatchKind::Tag, label.clone());
            for &pos in &cx.candidates {
                if self.records[pos].has_tag(key) {
                    cx.results
                        .add(pos, self.weights.tag, MatchKind::Tag, MatchedField::Tag, false);
                }
            }
            let count = self.records.iter().filter(|r| r.has_tag(key)).count();
            if count > 0 {
                cx.categories.push(CategorySuggestion {
                    kind: CategoryKind::Tag,
                    name: label.clone(),
                    count,
                });
            }
        }

        if marker {
            let primary_key = resolved.map(|(key, _)| key);
            let suggestions: Vec<(String, String)> = self
                .tags
                .prefix_matches(&token)
                .into_iter()
                .filter(|tag| Some(&tag.key) != primary_key.as_ref())
                .map(|tag| (tag.key.clone(), tag.label.clone()))
                .collect();
            for (key, label) in suggestions {
                let count = self.records.iter().filter(|r| r.has_tag(&key)).count();
                if count > 0 {
                    cx.categories.push(CategorySuggestion {
                        kind: CategoryKind::Tag,
                        name: label,
                        count,
                    });
                }
            }
        }

        TierFlow::Continue
    }

    /// Tier 2: full slash pattern. A complete combo query is unambiguous
    /// structured intent, so it terminates the search whether or not any
    /// candidate matched — fuzzy name noise must never dilute it.
    fn full_pattern_tier(&mut self, cx: &mut TierCx) -> TierFlow {
        let Some(pattern) = parse_full_pattern(&cx.query) else {
            return TierFlow::Continue;
        };

        cx.set_kind(MatchKind::Profession, pattern.label());
        let score = self.weights.profession + self.weights.full_pattern_bonus;
        for &pos in &cx.candidates {
            if pattern.matches(&self.records[pos]) {
                cx.results.add(
                    pos,
                    score,
                    MatchKind::Profession,
                    MatchedField::Profession,
                    false,
                );
            }
        }
        debug!(pattern = %pattern.label(), "combo pattern matched, halting tier pipeline");
        TierFlow::Halt
    }

    /// Tier 3: partial slash pattern. The user is still typing the second
    /// half; offer completions (counted against the unfiltered set) instead
    /// of guessing at results.
    fn partial_pattern_tier(&mut self, cx: &mut TierCx) -> TierFlow {
        if !cx.query.contains('/') {
            return TierFlow::Continue;
        }
        let Some(partial) = parse_partial_pattern(&cx.query) else {
            return TierFlow::Continue;
        };

        let mut suggestions: Vec<(Profession, usize)> =
            Profession::resolve_all_prefix_matches(&partial.partial_secondary)
                .into_iter()
                .map(|candidate| {
                    let count = self
                        .records
                        .iter()
                        .filter(|r| {
                            r.primary_classes.contains(&partial.primary)
                                && r.secondary_classes.contains(&candidate)
                        })
                        .count();
                    (candidate, count)
                })
                .filter(|(_, count)| *count > 0)
                .collect();

        if suggestions.is_empty() {
            return TierFlow::Continue;
        }

        // Stable sort: equal counts keep profession-table order
        suggestions.sort_by(|a, b| b.1.cmp(&a.1));
        cx.results.clear();
        cx.categories = suggestions
            .into_iter()
            .map(|(prof, count)| CategorySuggestion {
                kind: CategoryKind::Profession,
                name: prof.name().to_string(),
                count,
            })
            .collect();
        TierFlow::Halt
    }

    /// Tier 4: the whole query as a single profession token. Results score
    /// primary-role matches; the broader any-role count surfaces as an
    /// extra suggestion only when it adds something over the primary count.
    fn profession_tier(&mut self, cx: &mut TierCx) -> TierFlow {
        let Some(prof) = Profession::resolve(&cx.query) else {
            return TierFlow::Continue;
        };

        cx.set_kind(MatchKind::Profession, prof.name().to_string());
        for &pos in &cx.candidates {
            if self.records[pos].primary_classes.contains(&prof) {
                cx.results.add(
                    pos,
                    self.weights.profession,
                    MatchKind::Profession,
                    MatchedField::Profession,
                    false,
                );
            }
        }

        let primary_count = self
            .records
            .iter()
            .filter(|r| r.primary_classes.contains(&prof))
            .count();
        let any_count = self
            .records
            .iter()
            .filter(|r| {
                r.primary_classes.contains(&prof) || r.secondary_classes.contains(&prof)
            })
            .count();

        if primary_count > 0 {
            cx.categories.push(CategorySuggestion {
                kind: CategoryKind::Profession,
                name: prof.name().to_string(),
                count: primary_count,
            });
        }
        if any_count > primary_count {
            cx.categories.push(CategorySuggestion {
                kind: CategoryKind::Profession,
                name: format!("{} (any)", prof.name()),
                count: any_count,
            });
        }

        TierFlow::Continue
    }

    /// Tier 5: skill-name substring. Gated to queries of at least 4
    /// characters, and suppressed wholesale when the substring matches so
    /// many distinct skill names it can't be a meaningful signal.
    fn skill_tier(&mut self, cx: &mut TierCx) -> TierFlow {
        if cx.query.chars().count() < SKILL_QUERY_MIN_LEN {
            return TierFlow::Continue;
        }

        let mut hits: Vec<(usize, bool)> = Vec::new();
        let mut matched_names: HashSet<String> = HashSet::new();
        for &pos in &cx.candidates {
            let record = &self.records[pos];
            let mut on_bar = false;
            for name in &record.sub_item_names {
                if name.to_lowercase().contains(cx.query.as_str()) {
                    on_bar = true;
                    matched_names.insert(name.clone());
                }
            }
            let mut variant_only = false;
            for name in &record.variant_sub_item_names {
                if name.to_lowercase().contains(cx.query.as_str()) {
                    variant_only = true;
                    matched_names.insert(name.clone());
                }
            }
            if on_bar {
                hits.push((pos, false));
            } else if variant_only {
                hits.push((pos, true));
            }
        }

        if matched_names.len() > MAX_SENSIBLE_SKILL_MATCHES * SKILL_MATCH_SLACK {
            debug!(
                distinct = matched_names.len(),
                "substring matches too many skills, suppressing tier"
            );
            return TierFlow::Continue;
        }
        if hits.is_empty() {
            return TierFlow::Continue;
        }

        cx.set_kind(MatchKind::Skill, cx.query.clone());
        for (pos, in_variant) in hits {
            cx.results.add(
                pos,
                self.weights.skill,
                MatchKind::Skill,
                MatchedField::Skill,
                in_variant,
            );
        }
        TierFlow::Continue
    }

    /// Tier 6: fuzzy name fallback. Skipped outright when a categorical
    /// tier already claimed the match; uses the filter-scoped cached index
    /// when filters are active; merges only on score improvement.
    fn name_tier(&mut self, cx: &mut TierCx) -> TierFlow {
        if matches!(cx.kind, MatchKind::Tag | MatchKind::Profession) {
            debug!("categorical match suppresses fuzzy name tier");
            return TierFlow::Continue;
        }

        let hits = match &cx.signature {
            None => self.base_index.search(&mut self.matcher, &cx.query),
            Some(signature) => {
                let ids: HashSet<String> = cx
                    .candidates
                    .iter()
                    .map(|&pos| self.records[pos].id.clone())
                    .collect();
                let records = &self.records;
                let candidates = &cx.candidates;
                let index = self.filtered_cache.get_or_rebuild(signature.clone(), ids, || {
                    NameIndex::build(
                        candidates
                            .iter()
                            .map(|&pos| (pos, records[pos].name.as_str())),
                    )
                });
                index.search(&mut self.matcher, &cx.query)
            }
        };

        for hit in &hits {
            let score = self.weights.name * (1.0 - hit.distance);
            cx.results
                .add_if_better(hit.pos, score, MatchKind::Name, MatchedField::Name);
        }
        if !hits.is_empty() {
            cx.set_kind(MatchKind::Name, cx.query.clone());
        }
        TierFlow::Continue
    }
}
