//! Static reference tables used by the date corrector.
//!
//! These are corpus-specific: they exist because a handful of manuscripts
//! carry dates that no text rule can resolve (bare era names, calendar
//! labels without a year) and because some Egyptian-themed records carry a
//! dynasty instead of a year. The built-in entries can be replaced at run
//! time with a JSON file of the same shape (see `LookupTables::from_json`).

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ── Built-in entries ─────────────────────────────────────────────────

/// A dynasty label as it appears in the `date` column, with its era range.
pub struct DynastyEntry {
    pub label: &'static str,
    pub range: &'static str,
}

/// Egyptian dynasties and periods. Ranges carry the before-common-era
/// marker so the century extractor classifies them as `AEC`.
pub static DYNASTY_RANGES: &[DynastyEntry] = &[
    DynastyEntry {
        label: "IVe dynastie",
        range: "2575-2465 avant Jésus Christ",
    },
    DynastyEntry {
        label: "Ve dynastie",
        range: "2465-2323 avant Jésus Christ",
    },
    DynastyEntry {
        label: "XIIe dynastie",
        range: "1991-1783 avant Jésus Christ",
    },
    DynastyEntry {
        label: "XVIIIe dynastie",
        range: "1550-1292 avant Jésus Christ",
    },
    DynastyEntry {
        label: "XIXe dynastie",
        range: "1292-1186 avant Jésus Christ",
    },
    DynastyEntry {
        label: "XXe dynastie",
        range: "1186-1069 avant Jésus Christ",
    },
    DynastyEntry {
        label: "XXVIe dynastie",
        range: "664-525 avant Jésus Christ",
    },
    DynastyEntry {
        label: "Époque ptolémaïque",
        range: "332-30 avant Jésus Christ",
    },
];

/// Date strings too vague to classify on their own.
pub static AMBIGUOUS_DATES: &[&str] = &[
    "Hégire",
    "Ère chrétienne",
    "Ère séleucide",
    "Ère de Dioclétien",
    "Ère arménienne",
    "Époque moderne",
    "Sans date",
];

/// A manuscript whose ambiguous date has been looked up by hand.
pub struct OverrideEntry {
    pub manuscript: &'static str,
    pub date: &'static str,
}

/// Hand-checked dates, keyed by the manuscript shelfmark as the crawler
/// records it.
pub static DATE_OVERRIDES: &[OverrideEntry] = &[
    OverrideEntry {
        manuscript: "Arabe 5847",
        date: "Hégire 634 = 1237",
    },
    OverrideEntry {
        manuscript: "Arabe 3929",
        date: "Hégire 619 = 1222",
    },
    OverrideEntry {
        manuscript: "Persan 174",
        date: "Hégire 1030 = 1621",
    },
    OverrideEntry {
        manuscript: "Syriaque 344",
        date: "Ère séleucide 1957 = 1646",
    },
    OverrideEntry {
        manuscript: "Copte 13",
        date: "Ère de Dioclétien 896 = 1180",
    },
    OverrideEntry {
        manuscript: "Arménien 333",
        date: "Ère arménienne 1113 = 1664",
    },
    OverrideEntry {
        manuscript: "Éthiopien 32",
        date: "XVIIIe siècle",
    },
    OverrideEntry {
        manuscript: "Smith-Lesouëf 221",
        date: "XVIe siècle",
    },
];

// ── Loaded tables ────────────────────────────────────────────────────

/// The three lookup tables, read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTables {
    /// manuscript → corrected date
    #[serde(default)]
    pub date_overrides: HashMap<String, String>,
    /// dates that must be overridden by manuscript
    #[serde(default)]
    pub ambiguous_dates: HashSet<String>,
    /// dynasty label → era range
    #[serde(default)]
    pub dynasty_ranges: HashMap<String, String>,
}

impl LookupTables {
    /// The tables compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            date_overrides: DATE_OVERRIDES
                .iter()
                .map(|e| (e.manuscript.to_string(), e.date.to_string()))
                .collect(),
            ambiguous_dates: AMBIGUOUS_DATES.iter().map(|s| s.to_string()).collect(),
            dynasty_ranges: DYNASTY_RANGES
                .iter()
                .map(|e| (e.label.to_string(), e.range.to_string()))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Pretty JSON with sorted keys, suitable as a starting point for a
    /// custom tables file.
    pub fn to_json_pretty(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Sorted<'a> {
            date_overrides: std::collections::BTreeMap<&'a str, &'a str>,
            ambiguous_dates: Vec<&'a str>,
            dynasty_ranges: std::collections::BTreeMap<&'a str, &'a str>,
        }

        let mut ambiguous_dates: Vec<&str> =
            self.ambiguous_dates.iter().map(String::as_str).collect();
        ambiguous_dates.sort();
        let sorted = Sorted {
            date_overrides: self
                .date_overrides
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            ambiguous_dates,
            dynasty_ranges: self
                .dynasty_ranges
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&sorted)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_no_duplicate_keys() {
        let t = LookupTables::builtin();
        assert_eq!(t.date_overrides.len(), DATE_OVERRIDES.len());
        assert_eq!(t.dynasty_ranges.len(), DYNASTY_RANGES.len());
        assert_eq!(t.ambiguous_dates.len(), AMBIGUOUS_DATES.len());
    }

    #[test]
    fn test_dynasty_labels_are_not_ambiguous() {
        let t = LookupTables::builtin();
        for label in t.dynasty_ranges.keys() {
            assert!(!t.ambiguous_dates.contains(label));
        }
    }

    #[test]
    fn test_json_round_trip() {
        let t = LookupTables::builtin();
        let json = t.to_json_pretty().unwrap();
        assert_eq!(LookupTables::from_json(&json).unwrap(), t);
    }

    #[test]
    fn test_partial_json_defaults_missing_tables() {
        let t = LookupTables::from_json(r#"{"ambiguous_dates": ["Hégire"]}"#).unwrap();
        assert!(t.ambiguous_dates.contains("Hégire"));
        assert!(t.date_overrides.is_empty());
        assert!(t.dynasty_ranges.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(LookupTables::from_json("{ not json").is_err());
    }
}
