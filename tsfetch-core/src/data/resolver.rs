//! Source resolution: one fetch per source, strictly in priority order.
//!
//! The resolver is a lazy iterator. Nothing is fetched until the consumer
//! pulls the next attempt, so stopping early never contacts later sources.

use super::raw_table::RawTable;
use super::source::{Fetcher, SourceDescriptor, SourceError, SourceList, Tier};
use std::time::Duration;

/// Outcome of trying one source.
#[derive(Debug)]
pub struct SourceAttempt<'a> {
    pub tier: Tier,
    pub source: &'a SourceDescriptor,
    pub result: Result<RawTable, SourceError>,
}

/// Iterator over per-source attempts.
pub struct SourceResolver<'a> {
    fetcher: &'a dyn Fetcher,
    sources: Box<dyn Iterator<Item = (Tier, &'a SourceDescriptor)> + 'a>,
    timeout: Duration,
}

impl<'a> SourceResolver<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, sources: &'a SourceList, timeout: Duration) -> Self {
        Self {
            fetcher,
            sources: Box::new(sources.iter()),
            timeout,
        }
    }

    /// Fetch and parse a single source. Never panics, never retries.
    pub fn attempt(
        fetcher: &dyn Fetcher,
        source: &SourceDescriptor,
        timeout: Duration,
    ) -> Result<RawTable, SourceError> {
        let body = fetcher.fetch(&source.url, timeout)?;
        RawTable::from_csv(&body)
    }
}

impl<'a> Iterator for SourceResolver<'a> {
    type Item = SourceAttempt<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (tier, source) = self.sources.next()?;

        tracing::info!(%tier, url = %source.url, fetcher = self.fetcher.name(), "fetching source");
        let result = Self::attempt(self.fetcher, source, self.timeout);

        match &result {
            Ok(table) => tracing::info!(
                %tier,
                url = %source.url,
                rows = table.row_count(),
                columns = table.columns().len(),
                "fetched table"
            ),
            Err(e) => tracing::warn!(
                %tier,
                url = %source.url,
                kind = %e.kind(),
                error = %e,
                "source failed"
            ),
        }

        Some(SourceAttempt {
            tier,
            source,
            result,
        })
    }
}
