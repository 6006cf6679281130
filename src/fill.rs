//! Empty-cell defaulting for the free-text columns.

use std::collections::BTreeMap;

use tracing::info;

use crate::error::Result;
use crate::table::Table;

/// Cell values that stand for "no data" in crawler output.
const EMPTY_SENTINELS: &[&str] = &["nan", "NaN", "None"];

/// True when a cell carries no information.
pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || EMPTY_SENTINELS.contains(&trimmed)
}

/// `Some(cell)` unless the cell is a missing-value sentinel.
pub fn present(cell: &str) -> Option<&str> {
    if is_missing(cell) { None } else { Some(cell) }
}

/// Replace missing cells in each listed column with that column's default.
///
/// Returns how many cells were filled per column. A listed column that is
/// absent from the table is a structural error.
pub fn fill_empty_cells(
    table: &mut Table,
    defaults: &[(&str, &str)],
) -> Result<BTreeMap<String, usize>> {
    // Check every column up front so a failure leaves the table untouched.
    for (column, _) in defaults {
        table.column_index(column)?;
    }

    let mut filled = BTreeMap::new();
    for (column, default) in defaults {
        let mut count = 0usize;
        table.update_column(column, |cell| {
            if is_missing(cell) {
                *cell = default.to_string();
                count += 1;
            }
        })?;
        info!(column, count, "filled empty cells");
        filled.insert(column.to_string(), count);
    }
    Ok(filled)
}
