//! Place → country/region resolution.
//!
//! Place strings in the corpus look like:
//!   Paris (France)
//!   Lombardie (Milan, Italie)
//!   Paris (Nord)
//!   Tours (et al.)
//!   Paris
//!   Bourges, Touraine
//!
//! Some rows annotate a place with its country, most don't. The annotated
//! rows are used to learn a `CountryMap` for the whole dataset, which then
//! resolves the bare ones.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use manuscript_types::UNKNOWN_PLACE;

/// Parenthetical contents that say nothing about the country.
const NO_OP_MARKERS: &[&str] = &["et al.", "et al"];

/// Compass words: "Paris (Nord)" is a part of Paris, not a country.
const DIRECTION_WORDS: &[&str] = &[
    "sud",
    "nord",
    "est",
    "ouest",
    "centre",
    "sud-est",
    "nord-est",
    "sud-ouest",
    "nord-ouest",
];

static RE_ET_AL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\(\s*et al\.?\s*\)\s*$").unwrap());

fn normalized(content: &str) -> String {
    content.trim().to_lowercase()
}

fn is_direction(content: &str) -> bool {
    DIRECTION_WORDS.contains(&normalized(content).as_str())
}

fn is_no_op(content: &str) -> bool {
    let c = normalized(content);
    NO_OP_MARKERS.contains(&c.as_str()) || DIRECTION_WORDS.contains(&c.as_str())
}

/// Split "base (content) ..." at the first parenthesis pair.
/// Returns `None` when there is no opening parenthesis.
fn split_parenthetical(place: &str) -> Option<(&str, &str)> {
    let open = place.find('(')?;
    let base = place[..open].trim();
    let rest = &place[open + 1..];
    let content = match rest.find(')') {
        Some(close) => &rest[..close],
        None => rest,
    };
    Some((base, content))
}

/// "Milan, Italie" → "Italie"; "Italie" → "Italie".
fn country_of(content: &str) -> &str {
    match content.rfind(',') {
        Some(idx) => content[idx + 1..].trim(),
        None => content.trim(),
    }
}

// ── Learned map ──────────────────────────────────────────────────────

/// Base place name → country/region, learned from the dataset itself.
///
/// Built once by `build_parent_country_map` and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryMap {
    entries: HashMap<String, String>,
}

impl CountryMap {
    pub fn get(&self, base: &str) -> Option<&str> {
        self.entries.get(base).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Learn `base → country` from every informative "X (Y)" annotation.
///
/// The first annotation seen for a base wins; later ones are ignored.
pub fn build_parent_country_map<'a, I>(places: I) -> CountryMap
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut entries: HashMap<String, String> = HashMap::new();

    for place in places.into_iter().flatten() {
        let Some((base, content)) = split_parenthetical(place) else {
            continue;
        };
        if is_no_op(content) {
            continue;
        }
        let country = country_of(content);
        if base.is_empty() || country.is_empty() {
            continue;
        }
        match entries.get(base) {
            Some(existing) if existing != country => {
                debug!(base, kept = %existing, ignored = country, "conflicting country annotation");
            }
            Some(_) => {}
            None => {
                entries.insert(base.to_string(), country.to_string());
            }
        }
    }

    CountryMap { entries }
}

// ── Resolution ───────────────────────────────────────────────────────

/// Country/region label for one place.
pub fn resolve_country(place: Option<&str>, map: &CountryMap) -> String {
    let Some(place) = place else {
        return UNKNOWN_PLACE.to_string();
    };
    let place = RE_ET_AL_SUFFIX.replace(place, "");
    let place = place.trim();

    if let Some((base, content)) = split_parenthetical(place) {
        if is_direction(content) {
            return non_empty_or_unknown(base);
        }
        let country = country_of(content);
        if !country.is_empty() {
            return country.to_string();
        }
        // "Paris ()", "Paris (Île-de-France,)": nothing usable inside
        return resolve_root(base, map);
    }

    resolve_root(place, map)
}

/// Bare place: learned country for the text before the first comma,
/// else that text itself.
fn resolve_root(place: &str, map: &CountryMap) -> String {
    let root = match place.find(',') {
        Some(idx) => place[..idx].trim(),
        None => place.trim(),
    };
    match map.get(root) {
        Some(country) => country.to_string(),
        None => non_empty_or_unknown(root),
    }
}

fn non_empty_or_unknown(name: &str) -> String {
    if name.is_empty() {
        UNKNOWN_PLACE.to_string()
    } else {
        name.to_string()
    }
}

/// Resolve every place, one output per input, in order.
pub fn extract_country<'a, I>(places: I, map: &CountryMap) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    places
        .into_iter()
        .map(|p| resolve_country(p, map))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn learn(places: &[&str]) -> CountryMap {
        build_parent_country_map(places.iter().map(|p| Some(*p)))
    }

    fn resolve(place: &str, map: &CountryMap) -> String {
        resolve_country(Some(place), map)
    }

    #[test]
    fn test_learn_simple_and_regional() {
        let map = learn(&["Paris (France)", "Lombardie (Milan, Italie)", "Tours"]);
        assert_eq!(map.get("Paris"), Some("France"));
        assert_eq!(map.get("Lombardie"), Some("Italie"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_learn_skips_no_op_annotations() {
        let map = learn(&["Paris (Nord)", "Tours (et al.)", "Rouen (ET AL)", "Lyon ( sud-est )"]);
        assert!(map.is_empty());
    }

    #[test]
    fn test_learn_first_seen_wins() {
        let map = learn(&["Paris (France)", "Paris (Île-de-France, Royaume de France)"]);
        assert_eq!(map.get("Paris"), Some("France"));
    }

    #[test]
    fn test_learn_ignores_missing() {
        let map = build_parent_country_map([None, Some("Gand (Flandre)")]);
        assert_eq!(map.get("Gand"), Some("Flandre"));
    }

    #[test]
    fn test_resolve_direction_keeps_base() {
        let map = CountryMap::default();
        assert_eq!(resolve("Paris (Nord)", &map), "Paris");
        assert_eq!(resolve("Italie (nord-est)", &map), "Italie");
    }

    #[test]
    fn test_resolve_parenthetical_country() {
        let map = CountryMap::default();
        assert_eq!(resolve("Lombardie (Italie)", &map), "Italie");
        assert_eq!(resolve("Lombardie (Milan, Italie)", &map), "Italie");
    }

    #[test]
    fn test_resolve_bare_place_uses_learned_map() {
        let map = learn(&["Paris (France)"]);
        assert_eq!(resolve("Paris", &map), "France");
        assert_eq!(resolve("Paris, atelier du Maître de Bedford", &map), "France");
        assert_eq!(resolve("Bruges", &map), "Bruges");
        assert_eq!(resolve("Bourges, Touraine", &map), "Bourges");
    }

    #[test]
    fn test_resolve_strips_et_al_suffix() {
        let map = learn(&["Tours (France)"]);
        assert_eq!(resolve("Tours (et al.)", &map), "France");
        assert_eq!(resolve("Tours (Et Al.)", &map), "France");
        assert_eq!(resolve("Tours (Touraine) (et al.)", &map), "Touraine");
    }

    #[test]
    fn test_resolve_empty_parenthetical() {
        let map = learn(&["Paris (France)"]);
        assert_eq!(resolve("Paris ()", &map), "France");
        assert_eq!(resolve("Paris (Île-de-France,)", &map), "France");
        assert_eq!(resolve("Gand ( )", &map), "Gand");
        assert_eq!(resolve("()", &map), "Origine inconnue");
        assert_eq!(resolve("(Nord)", &map), "Origine inconnue");
        assert_eq!(resolve(", Flandre", &map), "Origine inconnue");
    }

    #[test]
    fn test_resolve_missing() {
        let map = CountryMap::default();
        assert_eq!(resolve_country(None, &map), "Origine inconnue");
        assert_eq!(resolve("Origine inconnue", &map), "Origine inconnue");
    }

    #[test]
    fn test_extract_country_preserves_order() {
        let places = [Some("Paris"), None, Some("Paris (France)"), Some("Gand")];
        let map = build_parent_country_map(places);
        assert_eq!(
            extract_country(places, &map),
            ["France", "Origine inconnue", "France", "Gand"]
        );
    }
}
