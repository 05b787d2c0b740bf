//! tsfetch core: resolve a daily time-series table from ordered remote
//! sources, normalize it to the canonical schema, and write it out.
//!
//! - Source list, fetch trait and HTTP fetcher
//! - Raw CSV tables with inferred column kinds
//! - Normalizer: exact match or heuristic reshape to
//!   `Date,Open,High,Low,Close,Volume`
//! - Embedded sample table as the terminal fallback
//! - Atomic CSV persistence
//! - Sequential fallback pipeline and its run summary

pub mod config;
pub mod data;
pub mod pipeline;

pub use config::{ConfigError, FetchConfig};
pub use pipeline::{AttemptOutcome, AttemptRecord, FailureStage, Pipeline, Resolution, RunSummary};
