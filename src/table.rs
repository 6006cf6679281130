//! In-memory dataset: ordered named columns over string cells.
//!
//! Every pipeline stage takes and returns a whole `Table`. Columns the
//! pipeline does not know about are carried through in place.

use std::fs;
use std::path::Path;

use manuscript_types::{self as cols, Record};

use crate::error::{NormalizeError, Result};

/// Delimiter of the merged and normalized dataset.
pub const DATASET_DELIMITER: u8 = b';';
/// Delimiter of the per-keyword crawler files.
pub const CRAWLER_DELIMITER: u8 = b',';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table, checking every row against the header width.
    pub fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(NormalizeError::RaggedRow {
                row: self.rows.len() + 1,
                found: row.len(),
                expected: self.headers.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| NormalizeError::MissingColumn(name.to_string()))
    }

    /// Borrow one column top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Rewrite one column in place, row by row.
    pub fn update_column<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&mut String),
    {
        let idx = self.column_index(name)?;
        for row in &mut self.rows {
            f(&mut row[idx]);
        }
        Ok(())
    }

    /// Remove a column if present. Returns whether anything was dropped.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.headers.iter().position(|h| h == name) else {
            return false;
        };
        self.headers.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }

    /// Insert `name` immediately to the right of `anchor`.
    ///
    /// `values` must hold exactly one cell per row.
    pub fn insert_column_after(
        &mut self,
        anchor: &str,
        name: &str,
        values: Vec<String>,
    ) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(NormalizeError::RaggedRow {
                row: 0,
                found: values.len(),
                expected: self.rows.len(),
            });
        }
        let at = self.column_index(anchor)? + 1;
        self.headers.insert(at, name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(at, value);
        }
        Ok(())
    }

    /// Append a column at the right edge.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        let last = match self.headers.last() {
            Some(h) => h.clone(),
            None => return Err(NormalizeError::MissingColumn(name.to_string())),
        };
        self.insert_column_after(&last, name, values)
    }

    // ── Typed view ───────────────────────────────────────────────────

    /// Project the table onto canonical records. Requires every canonical
    /// column, so only meaningful on normalized output.
    pub fn to_records(&self) -> Result<Vec<Record>> {
        let idx = |name: &str| self.column_index(name);
        let (url, ms, folio, caption, text) = (
            idx(cols::IMAGE_URL)?,
            idx(cols::MANUSCRIPT)?,
            idx(cols::FOLIO)?,
            idx(cols::CAPTION)?,
            idx(cols::INSCRIBED_TEXT)?,
        );
        let (artist, place, country, date, century) = (
            idx(cols::ARTIST)?,
            idx(cols::PLACE)?,
            idx(cols::COUNTRY_REGION)?,
            idx(cols::DATE)?,
            idx(cols::CENTURY)?,
        );
        let (keyword, key) = (idx(cols::KEYWORD)?, idx(cols::MANUSCRIPT_FOLIO_KEY)?);

        Ok(self
            .rows
            .iter()
            .map(|r| Record {
                image_url: r[url].clone(),
                manuscript: r[ms].clone(),
                folio: r[folio].clone(),
                caption: r[caption].clone(),
                inscribed_text: r[text].clone(),
                artist: r[artist].clone(),
                place: r[place].clone(),
                country_region: r[country].clone(),
                date: r[date].clone(),
                century: r[century].clone(),
                keyword: r[keyword].clone(),
                manuscript_folio_key: r[key].clone(),
            })
            .collect())
    }

    // ── File I/O ─────────────────────────────────────────────────────

    /// Read a delimited file with a header row.
    pub fn read(path: &Path, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        let mut table = Self::new(headers);
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect())?;
        }
        Ok(table)
    }

    /// Write the table, replacing `path` only once the whole file is on disk.
    /// On failure the temporary sibling is removed and `path` is untouched.
    pub fn write(&self, path: &Path, delimiter: u8) -> Result<()> {
        let tmp = path.with_extension("tmp");
        let written = self
            .write_unchecked(&tmp, delimiter)
            .and_then(|()| fs::rename(&tmp, path).map_err(NormalizeError::from));
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }

    fn write_unchecked(&self, path: &Path, delimiter: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_parts(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec!["1".into(), "2".into(), "3".into()],
                vec!["4".into(), "5".into(), "6".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_insert_after_anchor() {
        let mut t = sample();
        t.insert_column_after("a", "x", vec!["p".into(), "q".into()])
            .unwrap();
        assert_eq!(t.headers(), ["a", "x", "b", "c"]);
        assert_eq!(t.rows()[1], ["4", "q", "5", "6"]);
    }

    #[test]
    fn test_drop_column() {
        let mut t = sample();
        assert!(t.drop_column("b"));
        assert!(!t.drop_column("b"));
        assert_eq!(t.headers(), ["a", "c"]);
        assert_eq!(t.rows()[0], ["1", "3"]);
    }

    #[test]
    fn test_missing_column_is_error() {
        let t = sample();
        assert!(matches!(
            t.column("nope"),
            Err(NormalizeError::MissingColumn(c)) if c == "nope"
        ));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut t = sample();
        assert!(matches!(
            t.push_row(vec!["only".into()]),
            Err(NormalizeError::RaggedRow { found: 1, expected: 3, .. })
        ));
    }

    #[test]
    fn test_file_round_trip_keeps_semicolon_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let t = Table::from_parts(
            vec!["place".into(), "date".into()],
            vec![vec!["Lombardie (Milan, Italie)".into(), "1450".into()]],
        )
        .unwrap();
        t.write(&path, DATASET_DELIMITER).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("place;date\n"));
        assert_eq!(Table::read(&path, DATASET_DELIMITER).unwrap(), t);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_failed_write_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target makes the final rename fail.
        let path = dir.path().join("data.csv");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let t = sample();
        assert!(t.write(&path, DATASET_DELIMITER).is_err());
        assert!(!path.with_extension("tmp").exists());
        assert!(path.join("keep").exists());
    }
}
