//! Pipeline orchestration: primary → secondaries → embedded sample → write.
//!
//! Every fetch, parse and schema failure is absorbed here and turned into
//! "try the next tier". The only error a run can return is a persistence
//! failure.

use crate::data::normalize::{Normalizer, SchemaError, Strategy};
use crate::data::persist::{write_csv, PersistError};
use crate::data::resolver::{SourceAttempt, SourceResolver};
use crate::data::sample::sample_table;
use crate::data::schema::{CanonicalTable, CANONICAL_COLUMNS};
use crate::data::source::{Fetcher, SourceError, SourceList, Tier};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Stage at which a source was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Network,
    Parse,
    Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Accepted { rows: usize },
    Failed { stage: FailureStage, reason: String },
}

/// Record of one source attempt, kept for the run summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptRecord {
    pub url: String,
    #[serde(flatten)]
    pub tier: Tier,
    pub outcome: AttemptOutcome,
}

impl AttemptRecord {
    fn source_failed(attempt: &SourceAttempt<'_>, err: &SourceError) -> Self {
        let stage = if err.is_network() {
            FailureStage::Network
        } else {
            FailureStage::Parse
        };
        Self {
            url: attempt.source.url.clone(),
            tier: attempt.tier,
            outcome: AttemptOutcome::Failed {
                stage,
                reason: err.to_string(),
            },
        }
    }

    fn schema_failed(attempt: &SourceAttempt<'_>, err: &SchemaError) -> Self {
        Self {
            url: attempt.source.url.clone(),
            tier: attempt.tier,
            outcome: AttemptOutcome::Failed {
                stage: FailureStage::Schema,
                reason: err.to_string(),
            },
        }
    }
}

/// The single table a run settles on, plus how it got there.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub table: CanonicalTable,
    pub tier: Tier,
    /// URL of the winning source; `None` for the embedded sample.
    pub source: Option<String>,
    pub attempts: Vec<AttemptRecord>,
}

/// Summary reported after a successful write.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    #[serde(flatten)]
    pub tier: Tier,
    pub source: Option<String>,
    pub rows: usize,
    pub columns: Vec<String>,
    pub data_hash: String,
    pub attempts: Vec<AttemptRecord>,
    pub generated_at: DateTime<Utc>,
}

/// Sequential fallback pipeline over a list of sources.
pub struct Pipeline<'a> {
    fetcher: &'a dyn Fetcher,
    sources: SourceList,
    timeout: Duration,
}

impl<'a> Pipeline<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, sources: SourceList, timeout: Duration) -> Self {
        Self {
            fetcher,
            sources,
            timeout,
        }
    }

    /// Resolve exactly one non-empty canonical table. Never fails.
    pub fn resolve(&self) -> Resolution {
        let mut attempts = Vec::new();

        for attempt in SourceResolver::new(self.fetcher, &self.sources, self.timeout) {
            let raw = match &attempt.result {
                Ok(raw) => raw,
                Err(e) => {
                    attempts.push(AttemptRecord::source_failed(&attempt, e));
                    continue;
                }
            };

            match Normalizer::normalize(raw) {
                Ok((table, strategy)) => {
                    if strategy == Strategy::Reshape {
                        tracing::warn!(
                            url = %attempt.source.url,
                            "reshaped to canonical schema; Open/High/Low/Volume are placeholders"
                        );
                    }
                    tracing::info!(
                        tier = %attempt.tier,
                        url = %attempt.source.url,
                        rows = table.len(),
                        ?strategy,
                        "source accepted"
                    );
                    attempts.push(AttemptRecord {
                        url: attempt.source.url.clone(),
                        tier: attempt.tier,
                        outcome: AttemptOutcome::Accepted { rows: table.len() },
                    });
                    return Resolution {
                        table,
                        tier: attempt.tier,
                        source: Some(attempt.source.url.clone()),
                        attempts,
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        tier = %attempt.tier,
                        url = %attempt.source.url,
                        error = %e,
                        "data format not compatible"
                    );
                    attempts.push(AttemptRecord::schema_failed(&attempt, &e));
                }
            }
        }

        tracing::info!(
            sources = self.sources.len(),
            "all sources failed, using embedded sample data"
        );
        Resolution {
            table: sample_table().clone(),
            tier: Tier::Sample,
            source: None,
            attempts,
        }
    }

    /// Resolve a table and write it to `output`.
    pub fn run(&self, output: &Path) -> Result<RunSummary, PersistError> {
        let resolution = self.resolve();
        write_csv(&resolution.table, output)?;
        tracing::info!(
            path = %output.display(),
            rows = resolution.table.len(),
            tier = %resolution.tier,
            "data saved"
        );

        Ok(RunSummary {
            output: output.to_path_buf(),
            tier: resolution.tier,
            source: resolution.source,
            rows: resolution.table.len(),
            columns: CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            data_hash: resolution.table.data_hash(),
            attempts: resolution.attempts,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DeadFetcher;

    impl Fetcher for DeadFetcher {
        fn name(&self) -> &str {
            "dead"
        }

        fn fetch(&self, _url: &str, timeout: Duration) -> Result<String, SourceError> {
            Err(SourceError::Timeout { timeout })
        }
    }

    #[test]
    fn dead_network_falls_back_to_sample() {
        let sources = SourceList::from_urls("http://a", &["http://b", "http://c"]);
        let pipeline = Pipeline::new(&DeadFetcher, sources, Duration::from_secs(1));
        let res = pipeline.resolve();

        assert_eq!(res.tier, Tier::Sample);
        assert_eq!(res.source, None);
        assert_eq!(&res.table, sample_table());
        assert_eq!(res.attempts.len(), 3);
        assert!(res.attempts.iter().all(|a| matches!(
            a.outcome,
            AttemptOutcome::Failed {
                stage: FailureStage::Network,
                ..
            }
        )));
    }

    #[test]
    fn attempt_record_serializes_flat() {
        let rec = AttemptRecord {
            url: "http://a".into(),
            tier: Tier::Secondary { index: 0 },
            outcome: AttemptOutcome::Failed {
                stage: FailureStage::Schema,
                reason: "no date column".into(),
            },
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["tier"], "secondary");
        assert_eq!(json["index"], 0);
        assert_eq!(json["outcome"]["status"], "failed");
        assert_eq!(json["outcome"]["stage"], "schema");
    }
}
