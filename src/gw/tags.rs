//! Tag vocabulary and token resolution
//!
//! Tags are a closed list of canonical keys with display labels, supplied as
//! configuration. A default catalog ships with the crate; callers with a
//! different vocabulary construct their own `TagTable`.

use serde::{Deserialize, Serialize};

/// Maximum number of tag suggestions returned for a prefix token.
pub const TAG_SUGGESTION_CAP: usize = 5;

/// A canonical tag key with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDef {
    pub key: String,
    pub label: String,
}

impl TagDef {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// The closed tag vocabulary.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    tags: Vec<TagDef>,
}

impl TagTable {
    pub fn new(tags: Vec<TagDef>) -> Self {
        Self { tags }
    }

    /// The tag vocabulary used by the public build catalog.
    pub fn default_catalog() -> Self {
        Self::new(vec![
            TagDef::new("meta", "Meta"),
            TagDef::new("pve", "PvE"),
            TagDef::new("pvp", "PvP"),
            TagDef::new("farming", "Farming"),
            TagDef::new("speedclear", "Speed Clear"),
            TagDef::new("beginner", "Beginner"),
            TagDef::new("hero", "Hero"),
            TagDef::new("solo", "Solo"),
            TagDef::new("general", "General"),
            TagDef::new("hardmode", "Hard Mode"),
        ])
    }

    pub fn tags(&self) -> &[TagDef] {
        &self.tags
    }

    /// Resolve a token to a tag.
    ///
    /// Exact match by key or label is always attempted. Prefix matching over
    /// key and label runs only in fuzzy mode and for tokens of at least 2
    /// characters; callers enable fuzzy mode for hashtag-prefixed tokens,
    /// where the marker signals deliberate category intent.
    pub fn resolve(&self, token: &str, fuzzy: bool) -> Option<&TagDef> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return None;
        }

        if let Some(tag) = self
            .tags
            .iter()
            .find(|t| t.key.to_lowercase() == token || t.label.to_lowercase() == token)
        {
            return Some(tag);
        }

        if fuzzy && token.chars().count() >= 2 {
            return self.tags.iter().find(|t| {
                t.key.to_lowercase().starts_with(&token)
                    || t.label.to_lowercase().starts_with(&token)
            });
        }

        None
    }

    /// Tags whose key or label starts with the token, capped at
    /// [`TAG_SUGGESTION_CAP`]. Used for hashtag autocomplete independent of
    /// whether a primary match was found.
    pub fn prefix_matches(&self, token: &str) -> Vec<&TagDef> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return Vec::new();
        }

        self.tags
            .iter()
            .filter(|t| {
                t.key.to_lowercase().starts_with(&token)
                    || t.label.to_lowercase().starts_with(&token)
            })
            .take(TAG_SUGGESTION_CAP)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_key() {
        let table = TagTable::default_catalog();
        assert_eq!(table.resolve("meta", false).unwrap().label, "Meta");
        assert_eq!(table.resolve("META", false).unwrap().key, "meta");
    }

    #[test]
    fn test_resolve_exact_label() {
        let table = TagTable::default_catalog();
        // A filter expressed by label still resolves to the canonical key
        assert_eq!(table.resolve("Speed Clear", false).unwrap().key, "speedclear");
        assert_eq!(table.resolve("pvp", false).unwrap().label, "PvP");
    }

    #[test]
    fn test_resolve_prefix_requires_fuzzy() {
        let table = TagTable::default_catalog();
        assert!(table.resolve("me", false).is_none());
        assert_eq!(table.resolve("me", true).unwrap().key, "meta");
    }

    #[test]
    fn test_resolve_fuzzy_min_length() {
        let table = TagTable::default_catalog();
        // Single characters never prefix-match even in fuzzy mode
        assert!(table.resolve("m", true).is_none());
    }

    #[test]
    fn test_prefix_matches() {
        let table = TagTable::default_catalog();
        let matches = table.prefix_matches("p");
        let keys: Vec<&str> = matches.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["pve", "pvp"]);
    }

    #[test]
    fn test_prefix_matches_cap() {
        let table = TagTable::new(
            (0..10)
                .map(|i| TagDef::new(&format!("tag{}", i), &format!("Tag {}", i)))
                .collect(),
        );
        assert_eq!(table.prefix_matches("tag").len(), TAG_SUGGESTION_CAP);
    }

    #[test]
    fn test_prefix_matches_empty_token() {
        let table = TagTable::default_catalog();
        assert!(table.prefix_matches("  ").is_empty());
    }
}
