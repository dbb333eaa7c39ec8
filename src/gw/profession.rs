//! Profession table and token resolution
//!
//! The ten professions form a closed classification vocabulary. Raw records
//! carry numeric profession ids where 0 means "no profession"; that sentinel
//! never appears in a normalized record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical profession value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Profession {
    Warrior,
    Ranger,
    Monk,
    Necromancer,
    Mesmer,
    Elementalist,
    Assassin,
    Ritualist,
    Paragon,
    Dervish,
}

/// Community shorthand that does not follow from the canonical name or
/// abbreviation. Single- and double-letter noise ("w", "e") is covered by
/// abbreviations instead.
const ALIASES: &[(&str, Profession)] = &[
    ("war", Profession::Warrior),
    ("warr", Profession::Warrior),
    ("mes", Profession::Mesmer),
    ("nec", Profession::Necromancer),
    ("ele", Profession::Elementalist),
    ("sin", Profession::Assassin),
    ("rit", Profession::Ritualist),
    ("para", Profession::Paragon),
    ("derv", Profession::Dervish),
];

impl Profession {
    /// All professions in canonical (campaign) order.
    pub const ALL: [Profession; 10] = [
        Profession::Warrior,
        Profession::Ranger,
        Profession::Monk,
        Profession::Necromancer,
        Profession::Mesmer,
        Profession::Elementalist,
        Profession::Assassin,
        Profession::Ritualist,
        Profession::Paragon,
        Profession::Dervish,
    ];

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Profession::Warrior => "Warrior",
            Profession::Ranger => "Ranger",
            Profession::Monk => "Monk",
            Profession::Necromancer => "Necromancer",
            Profession::Mesmer => "Mesmer",
            Profession::Elementalist => "Elementalist",
            Profession::Assassin => "Assassin",
            Profession::Ritualist => "Ritualist",
            Profession::Paragon => "Paragon",
            Profession::Dervish => "Dervish",
        }
    }

    /// Canonical abbreviation as used in combo notation ("W/Mo").
    pub fn abbrev(self) -> &'static str {
        match self {
            Profession::Warrior => "W",
            Profession::Ranger => "R",
            Profession::Monk => "Mo",
            Profession::Necromancer => "N",
            Profession::Mesmer => "Me",
            Profession::Elementalist => "E",
            Profession::Assassin => "A",
            Profession::Ritualist => "Rt",
            Profession::Paragon => "P",
            Profession::Dervish => "D",
        }
    }

    /// Numeric id used by raw catalog data.
    pub fn id(self) -> u32 {
        match self {
            Profession::Warrior => 1,
            Profession::Ranger => 2,
            Profession::Monk => 3,
            Profession::Necromancer => 4,
            Profession::Mesmer => 5,
            Profession::Elementalist => 6,
            Profession::Assassin => 7,
            Profession::Ritualist => 8,
            Profession::Paragon => 9,
            Profession::Dervish => 10,
        }
    }

    /// Map a raw numeric id back to a profession. Id 0 is the "no
    /// profession" sentinel and maps to `None`, as does anything out of
    /// range.
    pub fn from_id(id: u32) -> Option<Profession> {
        Profession::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Resolve a free-text token to a profession.
    ///
    /// Matching order: community alias, then exact canonical name or
    /// abbreviation, then canonical-name prefix. Prefix matching requires at
    /// least 3 characters so that stray single letters don't commit to a
    /// profession ("w" stays an abbreviation-only match).
    pub fn resolve(token: &str) -> Option<Profession> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return None;
        }

        for (alias, prof) in ALIASES {
            if *alias == token {
                return Some(*prof);
            }
        }

        for prof in Profession::ALL {
            if prof.name().to_lowercase() == token || prof.abbrev().to_lowercase() == token {
                return Some(prof);
            }
        }

        if token.chars().count() >= 3 {
            for prof in Profession::ALL {
                if prof.name().to_lowercase().starts_with(&token) {
                    return Some(prof);
                }
            }
        }

        None
    }

    /// All professions whose name, abbreviation, or alias starts with the
    /// token. No minimum length: these are discovery suggestions, not
    /// commitments. Order follows `ALL`.
    pub fn resolve_all_prefix_matches(token: &str) -> Vec<Profession> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return Vec::new();
        }

        Profession::ALL
            .into_iter()
            .filter(|prof| {
                prof.name().to_lowercase().starts_with(&token)
                    || prof.abbrev().to_lowercase().starts_with(&token)
                    || ALIASES
                        .iter()
                        .any(|(alias, p)| p == prof && alias.starts_with(&token))
            })
            .collect()
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_name() {
        assert_eq!(Profession::resolve("Warrior"), Some(Profession::Warrior));
        assert_eq!(Profession::resolve("monk"), Some(Profession::Monk));
        assert_eq!(Profession::resolve("  MESMER  "), Some(Profession::Mesmer));
    }

    #[test]
    fn test_resolve_abbreviation() {
        assert_eq!(Profession::resolve("w"), Some(Profession::Warrior));
        assert_eq!(Profession::resolve("mo"), Some(Profession::Monk));
        assert_eq!(Profession::resolve("Rt"), Some(Profession::Ritualist));
        assert_eq!(Profession::resolve("me"), Some(Profession::Mesmer));
    }

    #[test]
    fn test_resolve_alias() {
        assert_eq!(Profession::resolve("ele"), Some(Profession::Elementalist));
        assert_eq!(Profession::resolve("sin"), Some(Profession::Assassin));
        assert_eq!(Profession::resolve("necro"), Some(Profession::Necromancer));
        assert_eq!(Profession::resolve("derv"), Some(Profession::Dervish));
    }

    #[test]
    fn test_resolve_prefix_gated() {
        // 3+ characters may prefix-match the canonical name
        assert_eq!(Profession::resolve("necro"), Some(Profession::Necromancer));
        assert_eq!(Profession::resolve("assa"), Some(Profession::Assassin));
        // 2 characters never prefix-match ("ra" is not Ranger)
        assert_eq!(Profession::resolve("ra"), None);
        assert_eq!(Profession::resolve("x"), None);
    }

    #[test]
    fn test_resolve_empty() {
        assert_eq!(Profession::resolve(""), None);
        assert_eq!(Profession::resolve("   "), None);
    }

    #[test]
    fn test_prefix_matches_short_token() {
        // Suggestions are allowed to be short
        let matches = Profession::resolve_all_prefix_matches("m");
        assert!(matches.contains(&Profession::Monk));
        assert!(matches.contains(&Profession::Mesmer));
        assert!(!matches.contains(&Profession::Warrior));
    }

    #[test]
    fn test_prefix_matches_alias() {
        let matches = Profession::resolve_all_prefix_matches("el");
        assert_eq!(matches, vec![Profession::Elementalist]);
    }

    #[test]
    fn test_prefix_matches_no_duplicates() {
        // "me" hits Mesmer via both abbreviation and name prefix
        let matches = Profession::resolve_all_prefix_matches("me");
        assert_eq!(matches, vec![Profession::Mesmer]);
    }

    #[test]
    fn test_id_round_trip() {
        for prof in Profession::ALL {
            assert_eq!(Profession::from_id(prof.id()), Some(prof));
        }
        assert_eq!(Profession::from_id(0), None);
        assert_eq!(Profession::from_id(11), None);
    }
}
