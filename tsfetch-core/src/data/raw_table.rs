//! Untyped tabular payload as parsed from a CSV body.
//!
//! Cells are kept as the source text. Each column carries an inferred kind
//! so the normalizer can pick numeric columns without re-parsing.

use super::source::SourceError;

/// Inferred type of a raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Infer the kind of a column from its cells.
    ///
    /// Numeric kinds require at least one cell and no blank cells, so a
    /// numeric column never yields a missing value.
    pub fn infer<S: AsRef<str>>(values: &[S]) -> Self {
        if values.is_empty() {
            return ColumnKind::Text;
        }
        let trimmed = || values.iter().map(|v| v.as_ref().trim());
        if trimmed().all(|v| v.parse::<i64>().is_ok()) {
            ColumnKind::Integer
        } else if trimmed().all(|v| v.parse::<f64>().is_ok_and(f64::is_finite)) {
            ColumnKind::Float
        } else {
            ColumnKind::Text
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<String>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        let kind = ColumnKind::infer(&values);
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Numeric value of row `i`, if the column is numeric.
    pub fn number(&self, i: usize) -> Option<f64> {
        if !self.kind.is_numeric() {
            return None;
        }
        self.values.get(i)?.trim().parse::<f64>().ok()
    }
}

/// Raw table: ordered columns of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    columns: Vec<RawColumn>,
    rows: usize,
}

impl RawTable {
    /// Parse a CSV body. The first record is the header. Short records are
    /// padded with blank cells; a record longer than the header is malformed.
    pub fn from_csv(text: &str) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SourceError::Parse(format!("unreadable header: {e}")))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(SourceError::Parse("payload has no header row".into()));
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for (line, record) in reader.records().enumerate() {
            let record =
                record.map_err(|e| SourceError::Parse(format!("record {}: {e}", line + 1)))?;
            if record.len() > cells.len() {
                return Err(SourceError::Parse(format!(
                    "record {} has {} fields, header has {}",
                    line + 1,
                    record.len(),
                    cells.len()
                )));
            }
            for (i, col) in cells.iter_mut().enumerate() {
                col.push(record.get(i).unwrap_or_default().to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| RawColumn::new(name, values))
            .collect();
        Self::from_columns(columns)
    }

    /// Build a table from pre-built columns. All columns must have the same length.
    pub fn from_columns(columns: Vec<RawColumn>) -> Result<Self, SourceError> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(SourceError::Parse(format!(
                "column '{}' has {} values, expected {rows}",
                bad.name,
                bad.values.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    /// First column with exactly this name.
    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns.is_empty()
    }
}
