use serde::{Deserialize, Serialize};

// ── Column names ─────────────────────────────────────────────────────────

pub const IMAGE_URL: &str = "image_url";
pub const MANUSCRIPT: &str = "manuscript";
pub const FOLIO: &str = "folio";
pub const CAPTION: &str = "caption";
pub const INSCRIBED_TEXT: &str = "inscribed_text";
pub const ARTIST: &str = "artist";
pub const PLACE: &str = "place";
pub const COUNTRY_REGION: &str = "country_region";
pub const DATE: &str = "date";
pub const CENTURY: &str = "century";
pub const KEYWORD: &str = "keyword";
pub const MANUSCRIPT_FOLIO_KEY: &str = "manuscript_folio_key";

/// The eight fields the crawler emits for every image, in file order.
pub const RAW_COLUMNS: [&str; 8] = [
    IMAGE_URL,
    MANUSCRIPT,
    FOLIO,
    CAPTION,
    INSCRIBED_TEXT,
    ARTIST,
    PLACE,
    DATE,
];

/// Map a crawler header (English or the crawler's French spelling) onto
/// its canonical raw column name.
pub fn canonical_raw_column(header: &str) -> Option<&'static str> {
    match header.trim() {
        "image_url" | "img_url" => Some(IMAGE_URL),
        "manuscript" | "manuscrit" => Some(MANUSCRIPT),
        "folio" => Some(FOLIO),
        "caption" | "légende" => Some(CAPTION),
        "inscribed_text" | "texte" => Some(INSCRIBED_TEXT),
        "artist" | "artiste" => Some(ARTIST),
        "place" | "lieu" => Some(PLACE),
        "date" => Some(DATE),
        _ => None,
    }
}

// ── Defaults for missing cells ───────────────────────────────────────────

pub const UNKNOWN_PLACE: &str = "Origine inconnue";
pub const UNKNOWN_DATE: &str = "Date inconnue";
pub const UNKNOWN_ARTIST: &str = "Artiste non identifié";

/// Column → default value applied by the empty-cell pass.
pub const EMPTY_CELL_DEFAULTS: [(&str, &str); 3] = [
    (PLACE, UNKNOWN_PLACE),
    (DATE, UNKNOWN_DATE),
    (ARTIST, UNKNOWN_ARTIST),
];

// ── Canonical record ─────────────────────────────────────────────────────

/// One row of the normalized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub image_url: String,
    pub manuscript: String,
    pub folio: String,
    pub caption: String,
    pub inscribed_text: String,
    pub artist: String,
    pub place: String,
    /// Derived from `place`
    pub country_region: String,
    pub date: String,
    /// Derived from `date`
    pub century: String,
    /// Search term that produced the row
    pub keyword: String,
    pub manuscript_folio_key: String,
}

impl Record {
    /// `manuscript + ":" + folio`, the join key across keywords.
    pub fn folio_key(manuscript: &str, folio: &str) -> String {
        format!("{manuscript}:{folio}")
    }
}
