//! Normalization of illuminated-manuscript image metadata harvested from
//! the Mandragore search interface.
//!
//! The pipeline turns free-text `date` and `place` values into canonical
//! `century` and `country_region` columns. See `pipeline::normalize`.

pub mod century;
pub mod dates;
pub mod error;
pub mod fill;
pub mod keywords;
pub mod merge;
pub mod pipeline;
pub mod place;
pub mod table;
pub mod tables;

pub use error::{NormalizeError, Result};
pub use pipeline::{NormalizeReport, normalize, normalize_table};
pub use table::Table;
pub use tables::LookupTables;
