//! Record normalization
//!
//! Converts a raw [`Build`] into the immutable [`SearchableRecord`]
//! projection the search engine works on: resolved profession sets, resolved
//! skill names, and flattened note text. Normalization happens once per data
//! load; no search tier ever mutates a record.

use crate::error::NormalizeError;
use crate::gw::{Build, BuildSource, Profession};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

/// Skill id marking an empty bar slot.
pub const EMPTY_SKILL_SLOT: u32 = 0;

/// Resolves numeric skill ids to display names. Lookups may hit a data table
/// that is itself loaded on demand, so resolution is async and fallible.
#[allow(async_fn_in_trait)]
pub trait SkillResolver {
    async fn skill_name(&self, id: u32) -> Result<String, NormalizeError>;
}

/// The searchable projection of one build. Pure data: replaced wholesale on
/// each reload, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchableRecord {
    pub id: String,
    pub name: String,
    /// Canonical tag keys attached to the build.
    pub tags: Vec<String>,
    /// Professions appearing in the primary role across members.
    pub primary_classes: BTreeSet<Profession>,
    /// Professions appearing in the secondary role across members.
    pub secondary_classes: BTreeSet<Profession>,
    /// Resolved skill names, deduplicated and sorted.
    pub sub_item_names: Vec<String>,
    /// Skill names that exist only in alternate configurations.
    pub variant_sub_item_names: Vec<String>,
    /// Flattened plain text of the build's notes. Reserved for text search.
    pub extracted_text: String,
    pub source: BuildSource,
    /// The raw record, returned unmodified inside results.
    pub original: Build,
}

impl SearchableRecord {
    /// Union of primary and secondary professions.
    pub fn all_classes(&self) -> BTreeSet<Profession> {
        self.primary_classes
            .union(&self.secondary_classes)
            .copied()
            .collect()
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(key))
    }
}

/// Normalize one raw build.
///
/// Skill-name resolution failures never abort the batch: the record still
/// normalizes, with empty skill-name lists, and the failure is logged.
pub async fn normalize<R: SkillResolver>(
    build: &Build,
    source: BuildSource,
    resolver: &R,
) -> SearchableRecord {
    let mut primary_classes = BTreeSet::new();
    let mut secondary_classes = BTreeSet::new();
    for member in &build.members {
        if let Some(prof) = Profession::from_id(member.primary) {
            primary_classes.insert(prof);
        }
        if let Some(prof) = Profession::from_id(member.secondary) {
            secondary_classes.insert(prof);
        }
    }

    let (sub_item_names, variant_sub_item_names) = match resolve_skill_names(build, resolver).await
    {
        Ok(names) => names,
        Err(err) => {
            warn!(
                build_id = %build.id,
                error = %err,
                "skill name resolution failed, indexing build without skill names"
            );
            (Vec::new(), Vec::new())
        }
    };

    let extracted_text = build
        .notes
        .as_ref()
        .map(extract_note_text)
        .unwrap_or_default();

    SearchableRecord {
        id: build.id.clone(),
        name: build.name.clone(),
        tags: build.tags.clone(),
        primary_classes,
        secondary_classes,
        sub_item_names,
        variant_sub_item_names,
        extracted_text,
        source,
        original: build.clone(),
    }
}

async fn resolve_skill_names<R: SkillResolver>(
    build: &Build,
    resolver: &R,
) -> Result<(Vec<String>, Vec<String>), NormalizeError> {
    let mut names = BTreeSet::new();
    let mut variant_names = BTreeSet::new();

    for member in &build.members {
        for &id in &member.skills {
            if id != EMPTY_SKILL_SLOT {
                names.insert(resolver.skill_name(id).await?);
            }
        }
        for &id in &member.variants {
            if id != EMPTY_SKILL_SLOT {
                variant_names.insert(resolver.skill_name(id).await?);
            }
        }
    }

    // A name carried by a regular slot is not variant-only
    let variant_names = variant_names.difference(&names).cloned().collect();

    Ok((names.into_iter().collect(), variant_names))
}

/// Flatten a rich-text note document into whitespace-joined plain text.
///
/// Walks the document tree collecting `text` leaves and mention labels;
/// block boundaries become whitespace.
pub fn extract_note_text(doc: &Value) -> String {
    let mut parts = Vec::new();
    collect_text(doc, &mut parts);
    normalize_text(&parts.join(" "))
}

fn collect_text(node: &Value, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            if let Some(text) = map.get("text").and_then(Value::as_str) {
                if !text.trim().is_empty() {
                    out.push(text.trim().to_string());
                }
            }
            if map.get("type").and_then(Value::as_str) == Some("mention") {
                if let Some(label) = map
                    .get("attrs")
                    .and_then(|attrs| attrs.get("label"))
                    .and_then(Value::as_str)
                {
                    out.push(label.to_string());
                }
            }
            if let Some(children) = map.get("content") {
                collect_text(children, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text(item, out);
            }
        }
        _ => {}
    }
}

/// NFKC-normalize and collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    let normalized: String = text.nfkc().collect();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gw::BuildMember;
    use serde_json::json;
    use std::collections::HashMap;

    struct TableResolver {
        names: HashMap<u32, String>,
    }

    impl TableResolver {
        fn new(entries: &[(u32, &str)]) -> Self {
            Self {
                names: entries
                    .iter()
                    .map(|(id, name)| (*id, name.to_string()))
                    .collect(),
            }
        }
    }

    impl SkillResolver for TableResolver {
        async fn skill_name(&self, id: u32) -> Result<String, NormalizeError> {
            self.names
                .get(&id)
                .cloned()
                .ok_or(NormalizeError::SkillLookup {
                    id,
                    reason: "unknown id".to_string(),
                })
        }
    }

    fn sample_build() -> Build {
        Build {
            id: "b1".to_string(),
            name: "W/Mo Sword".to_string(),
            tags: vec!["meta".to_string()],
            members: vec![BuildMember {
                primary: 1,
                secondary: 3,
                skills: vec![10, 11, 0, 10],
                variants: vec![12, 11],
            }],
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_normalize_basic() {
        let resolver =
            TableResolver::new(&[(10, "Sever Artery"), (11, "Gash"), (12, "Final Thrust")]);
        let record = normalize(&sample_build(), BuildSource::Catalog, &resolver).await;

        assert_eq!(record.id, "b1");
        assert!(record.primary_classes.contains(&Profession::Warrior));
        assert!(record.secondary_classes.contains(&Profession::Monk));
        // Deduplicated, sorted, empty slot excluded
        assert_eq!(record.sub_item_names, vec!["Gash", "Sever Artery"]);
        // "Gash" is on the regular bar, so only "Final Thrust" is variant-only
        assert_eq!(record.variant_sub_item_names, vec!["Final Thrust"]);
    }

    #[tokio::test]
    async fn test_normalize_sentinel_professions() {
        let mut build = sample_build();
        build.members[0].secondary = 0;
        let resolver = TableResolver::new(&[(10, "a"), (11, "b"), (12, "c")]);
        let record = normalize(&build, BuildSource::Catalog, &resolver).await;
        assert!(record.secondary_classes.is_empty());
    }

    #[tokio::test]
    async fn test_normalize_failed_resolution_yields_empty_names() {
        // Resolver only knows skill 10; the record still normalizes
        let resolver = TableResolver::new(&[(10, "Sever Artery")]);
        let record = normalize(&sample_build(), BuildSource::Local, &resolver).await;

        assert!(record.sub_item_names.is_empty());
        assert!(record.variant_sub_item_names.is_empty());
        assert_eq!(record.name, "W/Mo Sword");
    }

    #[tokio::test]
    async fn test_normalize_extracts_notes() {
        let mut build = sample_build();
        build.notes = Some(json!({
            "type": "doc",
            "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Spike with"},
                    {"type": "mention", "attrs": {"id": "334", "label": "Final Thrust"}},
                ]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "after bleeding."}
                ]}
            ]
        }));
        let resolver = TableResolver::new(&[(10, "a"), (11, "b"), (12, "c")]);
        let record = normalize(&build, BuildSource::Catalog, &resolver).await;
        assert_eq!(record.extracted_text, "Spike with Final Thrust after bleeding.");
    }

    #[test]
    fn test_extract_note_text_blocks_as_separators() {
        let doc = json!({
            "type": "doc",
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "one"}]},
                {"type": "paragraph", "content": [{"type": "text", "text": "two"}]}
            ]
        });
        assert_eq!(extract_note_text(&doc), "one two");
    }

    #[test]
    fn test_normalize_text_nfkc() {
        // Fullwidth forms compose to ASCII under NFKC
        assert_eq!(normalize_text("Ｗａｒ"), "War");
        assert_eq!(normalize_text("  a \n b  "), "a b");
    }

    #[test]
    fn test_all_classes_union() {
        let record = SearchableRecord {
            id: "x".to_string(),
            name: "x".to_string(),
            tags: vec![],
            primary_classes: [Profession::Warrior].into_iter().collect(),
            secondary_classes: [Profession::Monk, Profession::Warrior].into_iter().collect(),
            sub_item_names: vec![],
            variant_sub_item_names: vec![],
            extracted_text: String::new(),
            source: BuildSource::Catalog,
            original: Build {
                id: "x".to_string(),
                name: "x".to_string(),
                tags: vec![],
                members: vec![],
                notes: None,
            },
        };
        assert_eq!(record.all_classes().len(), 2);
    }
}
