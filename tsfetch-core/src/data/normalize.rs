use super::raw_table::{RawColumn, RawTable};
use super::schema::{CanonicalRecord, CanonicalTable, CANONICAL_COLUMNS};
use thiserror::Error;

// Placeholder derivations for reshaped tables. These are NOT statistically or
// financially meaningful; changing them changes the tested reshape contract.
pub const OPEN_FACTOR: f64 = 0.995;
pub const HIGH_FACTOR: f64 = 1.01;
pub const LOW_FACTOR: f64 = 0.99;
pub const PLACEHOLDER_VOLUME: f64 = 50_000_000.0;

/// Case-insensitive token that marks a date-like column.
const DATE_TOKEN: &str = "date";

/// Why a raw table could not be normalized. The pipeline treats every
/// variant the same way: skip to the next source.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("empty input")]
    EmptyInput,

    #[error("no date column")]
    NoDateColumn,

    #[error("no numeric column")]
    NoNumericColumn,

    #[error("canonical column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    #[error("blank value in date column '{column}' at row {row}")]
    BlankDate { column: String, row: usize },
}

/// How a table was normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ExactMatch,
    Reshape,
}

/// Normalizer from raw tables to the canonical schema
pub struct Normalizer;

impl Normalizer {
    /// Normalize a raw table, reporting which rule applied.
    pub fn normalize(raw: &RawTable) -> Result<(CanonicalTable, Strategy), SchemaError> {
        if raw.is_empty() {
            return Err(SchemaError::EmptyInput);
        }

        if CANONICAL_COLUMNS.iter().all(|c| raw.column(c).is_some()) {
            return Self::project(raw).map(|t| (t, Strategy::ExactMatch));
        }

        Self::reshape(raw).map(|t| (t, Strategy::Reshape))
    }

    /// Exact match: keep the six canonical columns, drop everything else.
    fn project(raw: &RawTable) -> Result<CanonicalTable, SchemaError> {
        let date = raw.column("Date").ok_or(SchemaError::NoDateColumn)?;
        let open = numeric_column(raw, "Open")?;
        let high = numeric_column(raw, "High")?;
        let low = numeric_column(raw, "Low")?;
        let close = numeric_column(raw, "Close")?;
        let volume = numeric_column(raw, "Volume")?;

        let num = |c: &RawColumn, i: usize| {
            c.number(i).ok_or_else(|| SchemaError::NonNumericColumn {
                column: c.name.clone(),
            })
        };

        let mut records = Vec::with_capacity(raw.row_count());
        for i in 0..raw.row_count() {
            records.push(CanonicalRecord {
                date: date_cell(date, i)?,
                open: num(open, i)?,
                high: num(high, i)?,
                low: num(low, i)?,
                close: num(close, i)?,
                volume: num(volume, i)?,
            });
        }
        Ok(CanonicalTable::new(records))
    }

    /// Heuristic reshape: first date-like column plus first numeric column.
    ///
    /// Tie-breaks are by column order, not by any notion of the best column.
    fn reshape(raw: &RawTable) -> Result<CanonicalTable, SchemaError> {
        let date = raw
            .columns()
            .iter()
            .find(|c| c.name.to_lowercase().contains(DATE_TOKEN))
            .ok_or(SchemaError::NoDateColumn)?;

        let price = raw
            .columns()
            .iter()
            .find(|c| c.kind.is_numeric())
            .ok_or(SchemaError::NoNumericColumn)?;

        let mut records = Vec::with_capacity(raw.row_count());
        for i in 0..raw.row_count() {
            let close = price.number(i).ok_or(SchemaError::NoNumericColumn)?;
            records.push(CanonicalRecord {
                date: date_cell(date, i)?,
                open: close * OPEN_FACTOR,
                high: close * HIGH_FACTOR,
                low: close * LOW_FACTOR,
                close,
                volume: PLACEHOLDER_VOLUME,
            });
        }
        Ok(CanonicalTable::new(records))
    }
}

fn numeric_column<'t>(raw: &'t RawTable, name: &str) -> Result<&'t RawColumn, SchemaError> {
    match raw.column(name) {
        Some(c) if c.kind.is_numeric() => Ok(c),
        _ => Err(SchemaError::NonNumericColumn {
            column: name.to_string(),
        }),
    }
}

/// Date text of row `i`, verbatim. Blank cells reject the whole table.
fn date_cell(date: &RawColumn, i: usize) -> Result<String, SchemaError> {
    match date.values.get(i) {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(SchemaError::BlankDate {
            column: date.name.clone(),
            row: i + 1,
        }),
    }
}
