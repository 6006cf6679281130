//! Date correction ahead of century extraction.
//!
//! Two independent rewrites of the `date` column, applied in order:
//!   1. a dynasty label becomes "<label> = <era range>"
//!   2. an ambiguous date is replaced by the manuscript's override
//!
//! Rule 2 sees the output of rule 1.

use serde::Serialize;
use tracing::{info, warn};

use manuscript_types::{DATE, MANUSCRIPT, UNKNOWN_DATE};

use crate::error::Result;
use crate::table::Table;
use crate::tables::LookupTables;

/// What the corrector changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateCorrections {
    pub dynasty_annotated: usize,
    pub overrides_applied: usize,
    /// Manuscripts with an ambiguous date and no override entry,
    /// in first-seen order, without repeats.
    pub overrides_missing: Vec<String>,
}

/// Outcome of correcting one date value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    Unchanged,
    Dynasty,
    Override,
    /// Ambiguous date, but the manuscript has no override entry.
    OverrideMissing,
}

/// Rule 1: "XIXe dynastie" → "XIXe dynastie = 1292-1186 avant Jésus Christ".
pub fn annotate_dynasty(date: &str, tables: &LookupTables) -> Option<String> {
    tables
        .dynasty_ranges
        .get(date)
        .map(|range| format!("{date} = {range}"))
}

/// Rule 2: ambiguous dates are looked up by manuscript.
///
/// `None` if the date is not ambiguous, `Some(None)` on an override miss.
pub fn override_date<'t>(
    date: &str,
    manuscript: &str,
    tables: &'t LookupTables,
) -> Option<Option<&'t str>> {
    if !tables.ambiguous_dates.contains(date) {
        return None;
    }
    Some(tables.date_overrides.get(manuscript).map(String::as_str))
}

/// Apply both rules to one value.
pub fn correct_date(date: &str, manuscript: &str, tables: &LookupTables) -> (String, Correction) {
    let mut current = date.to_string();
    let mut correction = Correction::Unchanged;

    if let Some(annotated) = annotate_dynasty(&current, tables) {
        current = annotated;
        correction = Correction::Dynasty;
    }

    match override_date(&current, manuscript, tables) {
        None => {}
        Some(Some(replacement)) => {
            current = replacement.to_string();
            correction = Correction::Override;
        }
        Some(None) => {
            current = UNKNOWN_DATE.to_string();
            correction = Correction::OverrideMissing;
        }
    }

    (current, correction)
}

/// Rewrite the `date` column of the whole table.
pub fn correct_dates(table: &mut Table, tables: &LookupTables) -> Result<DateCorrections> {
    let date_idx = table.column_index(DATE)?;
    let manuscripts: Vec<String> = table
        .column(MANUSCRIPT)?
        .into_iter()
        .map(str::to_string)
        .collect();
    let dates: Vec<String> = table
        .rows()
        .iter()
        .map(|r| r[date_idx].clone())
        .collect();

    let mut stats = DateCorrections::default();
    let mut corrected = Vec::with_capacity(dates.len());

    for (date, manuscript) in dates.iter().zip(&manuscripts) {
        let (value, correction) = correct_date(date, manuscript, tables);
        match correction {
            Correction::Unchanged => {}
            Correction::Dynasty => stats.dynasty_annotated += 1,
            Correction::Override => stats.overrides_applied += 1,
            Correction::OverrideMissing => {
                if !stats.overrides_missing.contains(manuscript) {
                    warn!(manuscript = %manuscript, date = %date, "ambiguous date without override");
                    stats.overrides_missing.push(manuscript.clone());
                }
            }
        }
        corrected.push(value);
    }

    let mut values = corrected.into_iter();
    table.update_column(DATE, |cell| {
        if let Some(v) = values.next() {
            *cell = v;
        }
    })?;

    info!(
        dynasty = stats.dynasty_annotated,
        overrides = stats.overrides_applied,
        missing = stats.overrides_missing.len(),
        "corrected dates"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> LookupTables {
        LookupTables::from_json(
            r#"{
                "date_overrides": {"Arabe 5847": "Hégire 634 = 1237"},
                "ambiguous_dates": ["Hégire"],
                "dynasty_ranges": {"XIXe dynastie": "1292-1186 avant Jésus Christ"}
            }"#,
        )
        .unwrap()
    }

    fn table(rows: &[[&str; 2]]) -> Table {
        Table::from_parts(
            vec!["manuscript".into(), "date".into()],
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_dynasty_keeps_label_prefix() {
        let (value, c) = correct_date("XIXe dynastie", "Égyptien 1", &tables());
        assert_eq!(value, "XIXe dynastie = 1292-1186 avant Jésus Christ");
        assert_eq!(c, Correction::Dynasty);
    }

    #[test]
    fn test_override_by_manuscript() {
        let (value, c) = correct_date("Hégire", "Arabe 5847", &tables());
        assert_eq!(value, "Hégire 634 = 1237");
        assert_eq!(c, Correction::Override);
    }

    #[test]
    fn test_override_miss_is_unknown() {
        let (value, c) = correct_date("Hégire", "Arabe 1", &tables());
        assert_eq!(value, "Date inconnue");
        assert_eq!(c, Correction::OverrideMissing);
    }

    #[test]
    fn test_exact_match_only() {
        let t = tables();
        assert_eq!(correct_date("Hégire 634", "Arabe 5847", &t).1, Correction::Unchanged);
        assert_eq!(correct_date("xixe dynastie", "x", &t).1, Correction::Unchanged);
    }

    #[test]
    fn test_override_sees_dynasty_rewrite() {
        let mut t = tables();
        t.ambiguous_dates
            .insert("XIXe dynastie = 1292-1186 avant Jésus Christ".into());
        let (value, c) = correct_date("XIXe dynastie", "Égyptien 1", &t);
        assert_eq!(value, "Date inconnue");
        assert_eq!(c, Correction::OverrideMissing);
    }

    #[test]
    fn test_correct_table() {
        let mut t = table(&[
            ["Arabe 5847", "Hégire"],
            ["Arabe 1", "Hégire"],
            ["Arabe 1", "Hégire"],
            ["Égyptien 1", "XIXe dynastie"],
            ["Latin 1", "1450"],
        ]);
        let stats = correct_dates(&mut t, &tables()).unwrap();

        assert_eq!(
            t.column("date").unwrap(),
            [
                "Hégire 634 = 1237",
                "Date inconnue",
                "Date inconnue",
                "XIXe dynastie = 1292-1186 avant Jésus Christ",
                "1450",
            ]
        );
        assert_eq!(stats.dynasty_annotated, 1);
        assert_eq!(stats.overrides_applied, 1);
        assert_eq!(stats.overrides_missing, ["Arabe 1"]);
    }
}
