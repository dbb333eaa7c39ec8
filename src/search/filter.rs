//! Structured filters
//!
//! Filters narrow the candidate pool before any tier runs. They are a closed
//! sum type so the evaluator matches exhaustively; adding a filter kind is a
//! compile-checked change.

use crate::gw::{Profession, TagTable};
use crate::normalize::SearchableRecord;
use serde::{Deserialize, Serialize};

/// Which role a profession filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassRole {
    Primary,
    Secondary,
    #[default]
    Any,
}

/// How multiple filters combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    And,
    Or,
}

/// One structured filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BuildFilter {
    Profession {
        value: Profession,
        #[serde(default)]
        role: ClassRole,
    },
    Tag {
        value: String,
    },
    Skill {
        value: String,
    },
}

/// Whether a single record passes a single filter.
pub fn filter_matches(record: &SearchableRecord, filter: &BuildFilter, tags: &TagTable) -> bool {
    match filter {
        BuildFilter::Profession { value, role } => match role {
            ClassRole::Primary => record.primary_classes.contains(value),
            ClassRole::Secondary => record.secondary_classes.contains(value),
            ClassRole::Any => {
                record.primary_classes.contains(value) || record.secondary_classes.contains(value)
            }
        },
        BuildFilter::Tag { value } => {
            // A filter expressed by display label must still match records
            // storing the canonical key
            match tags.resolve(value, false) {
                Some(tag) => record.has_tag(&tag.key),
                None => record.has_tag(value),
            }
        }
        BuildFilter::Skill { value } => {
            let needle = value.to_lowercase();
            if needle.is_empty() {
                return false;
            }
            record
                .sub_item_names
                .iter()
                .chain(record.variant_sub_item_names.iter())
                .any(|name| name.to_lowercase().contains(&needle))
        }
    }
}

/// Narrow a record set to the candidate indices passing the filters.
/// An empty filter list is a no-op.
pub fn apply_filters(
    records: &[SearchableRecord],
    filters: &[BuildFilter],
    mode: FilterMode,
    tags: &TagTable,
) -> Vec<usize> {
    if filters.is_empty() {
        return (0..records.len()).collect();
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| match mode {
            FilterMode::And => filters.iter().all(|f| filter_matches(record, f, tags)),
            FilterMode::Or => filters.iter().any(|f| filter_matches(record, f, tags)),
        })
        .map(|(pos, _)| pos)
        .collect()
}
