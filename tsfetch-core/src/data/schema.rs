//! Canonical six-column time-series schema.

use serde::{Deserialize, Serialize};

/// Column names of the canonical table, in output order.
pub const CANONICAL_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// One canonical row. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Copied verbatim from the source; the format is not interpreted.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
}

impl CanonicalRecord {
    /// Fields formatted for CSV output, in canonical column order.
    pub fn to_fields(&self) -> [String; 6] {
        [
            self.date.clone(),
            self.open.to_string(),
            self.high.to_string(),
            self.low.to_string(),
            self.close.to_string(),
            self.volume.to_string(),
        ]
    }
}

/// Ordered sequence of canonical records. Row order is the producer's order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalTable {
    records: Vec<CanonicalRecord>,
}

impl CanonicalTable {
    pub fn new(records: Vec<CanonicalRecord>) -> Self {
        Self { records }
    }

    /// Parse a CSV body that already has the canonical header.
    pub fn from_csv(text: &str) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let records = reader
            .deserialize::<CanonicalRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// BLAKE3 hash over all rows, in order.
    pub fn data_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for r in &self.records {
            hasher.update(r.date.as_bytes());
            hasher.update(&[0]);
            hasher.update(&r.open.to_le_bytes());
            hasher.update(&r.high.to_le_bytes());
            hasher.update(&r.low.to_le_bytes());
            hasher.update(&r.close.to_le_bytes());
            hasher.update(&r.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}
