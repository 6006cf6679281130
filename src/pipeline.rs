//! The normalization pipeline.
//!
//! Stages run in a fixed order, each over the whole table:
//!   empty-cell fill → date correction → century → country/region
//!
//! Derived columns are dropped and recomputed on every run, so normalizing
//! an already-normalized table gives the same table back.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use manuscript_types::{
    ARTIST, CAPTION, CENTURY, COUNTRY_REGION, DATE, EMPTY_CELL_DEFAULTS, FOLIO, INSCRIBED_TEXT,
    KEYWORD, MANUSCRIPT, MANUSCRIPT_FOLIO_KEY, PLACE,
};

use crate::century::extract_century;
use crate::dates::{DateCorrections, correct_dates};
use crate::error::Result;
use crate::fill::{fill_empty_cells, present};
use crate::place::{build_parent_country_map, extract_country};
use crate::table::Table;
use crate::tables::LookupTables;

/// Columns the merged dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    MANUSCRIPT,
    FOLIO,
    CAPTION,
    INSCRIBED_TEXT,
    ARTIST,
    PLACE,
    DATE,
    KEYWORD,
    MANUSCRIPT_FOLIO_KEY,
];

// ── Run report ───────────────────────────────────────────────────────

/// Summary of one normalization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub rows: usize,
    /// Cells replaced by a default, per column
    pub filled: BTreeMap<String, usize>,
    pub dates: DateCorrections,
    /// Distinct places that carried a usable country annotation
    pub learned_places: usize,
    pub centuries: BTreeMap<String, usize>,
    pub countries: BTreeMap<String, usize>,
}

fn histogram(values: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v.clone()).or_insert(0usize) += 1;
    }
    counts
}

// ── Stages ───────────────────────────────────────────────────────────

/// Recompute `century` from `date` and place it right after `date`.
pub fn derive_century(table: &mut Table) -> Result<Vec<String>> {
    table.drop_column(CENTURY);
    let centuries: Vec<String> = table
        .column(DATE)?
        .into_iter()
        .map(|d| extract_century(present(d)))
        .collect();
    table.insert_column_after(DATE, CENTURY, centuries.clone())?;
    Ok(centuries)
}

/// Recompute `country_region` from `place` and place it right after `place`.
///
/// The place map is learned from the whole column before any row is
/// resolved. Returns the derived values and the number of learned places.
pub fn derive_country(table: &mut Table) -> Result<(Vec<String>, usize)> {
    table.drop_column(COUNTRY_REGION);
    let places: Vec<Option<&str>> = table.column(PLACE)?.into_iter().map(present).collect();
    let map = build_parent_country_map(places.iter().copied());
    let countries = extract_country(places.iter().copied(), &map);
    let learned = map.len();
    table.insert_column_after(PLACE, COUNTRY_REGION, countries.clone())?;
    Ok((countries, learned))
}

/// Run the full pipeline over a merged table.
pub fn normalize(mut table: Table, tables: &LookupTables) -> Result<(Table, NormalizeReport)> {
    for column in REQUIRED_COLUMNS {
        table.column_index(column)?;
    }
    info!(rows = table.len(), "normalizing");

    let filled = fill_empty_cells(&mut table, &EMPTY_CELL_DEFAULTS)?;
    let dates = correct_dates(&mut table, tables)?;

    let centuries = derive_century(&mut table)?;
    info!(distinct = histogram(&centuries).len(), "derived centuries");

    let (countries, learned_places) = derive_country(&mut table)?;
    info!(learned_places, "derived countries");

    let report = NormalizeReport {
        rows: table.len(),
        filled,
        dates,
        learned_places,
        centuries: histogram(&centuries),
        countries: histogram(&countries),
    };
    Ok((table, report))
}

/// Library entry point when the report is not needed.
pub fn normalize_table(table: Table, tables: &LookupTables) -> Result<Table> {
    normalize(table, tables).map(|(t, _)| t)
}
