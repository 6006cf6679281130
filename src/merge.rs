//! Merge per-keyword crawler files into one dataset.
//!
//! Expected folder layout:
//!   {folder}/gallica_data_{keyword}.csv
//!
//! Each file holds the eight raw crawler fields, comma-delimited. The
//! merged dataset is `;`-delimited, so any `;` inside a cell becomes `:`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use manuscript_types::{
    FOLIO, KEYWORD, MANUSCRIPT, MANUSCRIPT_FOLIO_KEY, RAW_COLUMNS, Record, canonical_raw_column,
};

use crate::error::{NormalizeError, Result};
use crate::table::{CRAWLER_DELIMITER, Table};

/// File name of the merged dataset inside the crawler folder.
pub const MERGED_FILE_NAME: &str = "mandragore_nh_global.csv";

/// "gallica_data_licorne" → "licorne"
pub fn keyword_from_stem(stem: &str) -> &str {
    stem.rsplit('_').next().unwrap_or(stem)
}

/// Keep the merged file unambiguous under its own delimiter.
pub fn sanitize_cell(cell: &str) -> String {
    cell.replace(';', ":")
}

/// Discover crawler files directly inside `folder`, sorted by name.
///
/// Skips `MERGED_FILE_NAME` and, when given, the file at `output`.
pub fn scan_crawler_files(folder: &Path, output: Option<&Path>) -> Vec<PathBuf> {
    let output = output.and_then(|p| fs::canonicalize(p).ok());
    WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .filter(|p| p.file_name().and_then(|n| n.to_str()) != Some(MERGED_FILE_NAME))
        .filter(|p| output.is_none() || fs::canonicalize(p).ok() != output)
        .collect()
}

/// Read one crawler file and reorder its columns onto `RAW_COLUMNS`.
fn read_crawler_file(path: &Path) -> Result<Table> {
    let raw = Table::read(path, CRAWLER_DELIMITER)?;

    let mut positions = Vec::with_capacity(RAW_COLUMNS.len());
    for column in RAW_COLUMNS {
        let idx = raw
            .headers()
            .iter()
            .position(|h| canonical_raw_column(h) == Some(column))
            .ok_or_else(|| {
                NormalizeError::MissingColumn(format!("{column} (in {})", path.display()))
            })?;
        positions.push(idx);
    }

    let rows = raw
        .rows()
        .iter()
        .map(|r| positions.iter().map(|&i| sanitize_cell(&r[i])).collect())
        .collect();
    Table::from_parts(RAW_COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

/// Merge every crawler file in `folder`, tagging rows with their keyword
/// and the manuscript/folio join key. `output`, when it lies inside
/// `folder`, is not read back in.
pub fn merge_folder(folder: &Path, output: Option<&Path>) -> Result<Table> {
    let files = scan_crawler_files(folder, output);
    if files.is_empty() {
        return Err(NormalizeError::EmptyFolder(folder.to_path_buf()));
    }

    let mut headers: Vec<String> = RAW_COLUMNS.iter().map(|c| c.to_string()).collect();
    headers.push(KEYWORD.to_string());
    headers.push(MANUSCRIPT_FOLIO_KEY.to_string());
    let mut merged = Table::new(headers);

    for path in &files {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let keyword = keyword_from_stem(stem).to_string();
        let table = read_crawler_file(path)?;
        let ms = table.column_index(MANUSCRIPT)?;
        let folio = table.column_index(FOLIO)?;

        debug!(file = %path.display(), keyword = %keyword, rows = table.len(), "merging");
        for row in table.rows() {
            let key = Record::folio_key(&row[ms], &row[folio]);
            let mut out = row.clone();
            out.push(keyword.clone());
            out.push(key);
            merged.push_row(out)?;
        }
    }

    info!(files = files.len(), rows = merged.len(), "merged crawler files");
    Ok(merged)
}
