//! Raw build records as loaded from a catalog
//!
//! These are the source-of-truth records supplied by the bulk loader. The
//! search core never reads them directly; it works on the normalized
//! projection (`SearchableRecord`) and hands the raw record back unmodified
//! inside results for display.

use serde::{Deserialize, Serialize};

/// Where a build was loaded from. The loader may merge several origins into
/// one record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSource {
    /// The shared public catalog.
    Catalog,
    /// The user's own saved builds.
    Local,
}

/// One character slot in a team build.
///
/// Profession and skill references are numeric ids as stored in the game
/// data tables; 0 means "none" for professions and "empty slot" for skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMember {
    pub primary: u32,
    pub secondary: u32,
    #[serde(default)]
    pub skills: Vec<u32>,
    /// Skills that only appear in alternate configurations of this slot.
    #[serde(default)]
    pub variants: Vec<u32>,
}

/// A catalog build: free-text name, category tags, one or more members, and
/// optional rich-text notes (a document tree as produced by the notes
/// editor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub members: Vec<BuildMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<serde_json::Value>,
}
