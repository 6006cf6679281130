//! Keyword list housekeeping.
//!
//! Search keywords are stored one per line in URL form ("arbre+de+vie");
//! the merged dataset wants them as plain text.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;

/// "arbre+de+vie" → "arbre de vie"
pub fn clean_keyword(line: &str) -> String {
    line.replace('+', " ")
}

/// Rewrite a keyword list in place. Returns the number of lines changed.
pub fn clean_keywords(path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path)?;
    let changed = content.lines().filter(|l| l.contains('+')).count();
    fs::write(path, clean_keyword(&content))?;
    info!(file = %path.display(), changed, "cleaned keyword list");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_keyword() {
        assert_eq!(clean_keyword("arbre+de+vie"), "arbre de vie");
        assert_eq!(clean_keyword("licorne"), "licorne");
    }

    #[test]
    fn test_clean_keywords_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.txt");
        fs::write(&path, "arbre+de+vie\nlicorne\nsaint+Georges\n").unwrap();

        assert_eq!(clean_keywords(&path).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "arbre de vie\nlicorne\nsaint Georges\n"
        );
    }
}
