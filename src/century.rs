//! Century extraction from free-text dates.
//!
//! Dates in the corpus come in many conventions:
//!   1450
//!   XIVe siècle (3e quart)
//!   XVe-XVIe siècles
//!   Ère séleucide 1957 = 1646
//!   XIXe dynastie = 1292-1186 avant Jésus Christ
//!   Date inconnue
//!
//! Each convention is one `CenturyRule`. Rules are tried in `RULE_ORDER`
//! and the first one that produces a label wins.

use std::sync::LazyLock;

use regex::Regex;

use manuscript_types::UNKNOWN_DATE;

/// Label for dates explicitly placed before the common era.
pub const BEFORE_COMMON_ERA: &str = "AEC";

// ── Regex patterns ───────────────────────────────────────────────────

// "avant Jésus Christ", "avant Jesus-Christ", "avant J.-C.", "av. J.-C.", "av J.C."
static RE_BEFORE_COMMON_ERA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)avant\s+j[ée]sus[\s-]*christ|avant\s+j\.?\s*-?\s*c\.?|\bav\.?\s*j\.?\s*-?\s*c\.?",
    )
    .unwrap()
});

// "XIVe siècle", "XVe-XVIe siècles", "XIIe". Only the first numeral is kept.
static RE_ROMAN_CENTURY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<roman>[IVX]+)e\b(?:\s*-\s*[IVX]+e\b)?(?:\s+si[èe]cles?)?").unwrap()
});

// "... = 1646": the common-era side of a calendar conversion.
// ASCII digits only: Arabic-Indic numerals carry the Hegira year.
static RE_EQUIVALENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*(?P<year>[0-9]{3,4})\b").unwrap());

static RE_BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?P<year>[0-9]{3,4})\b").unwrap());

// ── Roman numerals ───────────────────────────────────────────────────

const ROMAN_PAIRS: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Greedy subtractive conversion. `0` yields an empty string.
pub fn int_to_roman(mut n: u32) -> String {
    let mut out = String::new();
    for (value, symbol) in ROMAN_PAIRS {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}

/// Format a century number as a label: 15 → "XVe siècle".
pub fn century_label(century: u32) -> String {
    format!("{}e siècle", int_to_roman(century))
}

/// Century label of a common-era year: 1–100 → I, 101–200 → II, …
/// There is no year zero, so `0` has no century.
pub fn year_to_century_ec(year: u32) -> Option<String> {
    if year == 0 {
        return None;
    }
    Some(century_label((year - 1) / 100 + 1))
}

// ── Rules ────────────────────────────────────────────────────────────

/// One date convention the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CenturyRule {
    /// No value at all
    Missing,
    /// Already labelled "Date inconnue"
    Unknown,
    /// "avant Jésus Christ", "av. J.-C."
    BeforeCommonEra,
    /// "XIVe siècle", "XVe-XVIe siècles"
    RomanCentury,
    /// "Hégire 634 = 1237"
    Equivalence,
    /// "1450", "vers 1380-1390"
    BareYear,
    /// Nothing matched
    Fallback,
}

/// Evaluation order. Earlier rules shadow later ones.
pub const RULE_ORDER: [CenturyRule; 7] = [
    CenturyRule::Missing,
    CenturyRule::Unknown,
    CenturyRule::BeforeCommonEra,
    CenturyRule::RomanCentury,
    CenturyRule::Equivalence,
    CenturyRule::BareYear,
    CenturyRule::Fallback,
];

impl CenturyRule {
    /// Produce a label if this rule recognises the date, `None` to pass.
    pub fn apply(self, date: Option<&str>) -> Option<String> {
        match (self, date) {
            (Self::Missing, None) => Some(UNKNOWN_DATE.to_string()),
            (Self::Missing, Some(_)) => None,
            (Self::Fallback, _) => Some(UNKNOWN_DATE.to_string()),
            (_, None) => None,
            (Self::Unknown, Some(text)) => text
                .trim()
                .contains(UNKNOWN_DATE)
                .then(|| UNKNOWN_DATE.to_string()),
            (Self::BeforeCommonEra, Some(text)) => RE_BEFORE_COMMON_ERA
                .is_match(text)
                .then(|| BEFORE_COMMON_ERA.to_string()),
            (Self::RomanCentury, Some(text)) => RE_ROMAN_CENTURY
                .captures(text)
                .map(|caps| format!("{}e siècle", &caps["roman"])),
            (Self::Equivalence, Some(text)) => first_year(&RE_EQUIVALENCE, text),
            (Self::BareYear, Some(text)) => first_year(&RE_BARE_YEAR, text),
        }
    }
}

fn first_year(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    let year: u32 = caps["year"].parse().ok()?;
    year_to_century_ec(year)
}

/// Which rule decides the label for this date.
pub fn matching_rule(date: Option<&str>) -> (CenturyRule, String) {
    for rule in RULE_ORDER {
        if let Some(label) = rule.apply(date) {
            return (rule, label);
        }
    }
    // Fallback always answers; this is only reached if RULE_ORDER loses it.
    (CenturyRule::Fallback, UNKNOWN_DATE.to_string())
}

/// Normalized century label for one date value.
///
/// Always one of "Date inconnue", "AEC" or "<ROMAN>e siècle".
pub fn extract_century(date: Option<&str>) -> String {
    matching_rule(date).1
}
