//! Source descriptors, the fetch trait, and structured fetch errors.
//!
//! The Fetcher trait abstracts over the network so the resolver can be driven
//! by a real HTTP client in production and by a scripted mock in tests.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// A remote endpoint that may serve a CSV payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub url: String,
}

impl SourceDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Which fallback tier produced (or was attempting to produce) a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Tier {
    Primary,
    /// Zero-based position in the secondary list.
    Secondary { index: usize },
    Sample,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Primary => write!(f, "primary"),
            Tier::Secondary { index } => write!(f, "secondary #{}", index + 1),
            Tier::Sample => write!(f, "embedded sample"),
        }
    }
}

/// One primary source followed by ordered secondaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceList {
    primary: SourceDescriptor,
    secondaries: Vec<SourceDescriptor>,
}

impl SourceList {
    pub fn new(primary: SourceDescriptor, secondaries: Vec<SourceDescriptor>) -> Self {
        Self {
            primary,
            secondaries,
        }
    }

    /// Build from plain URLs.
    pub fn from_urls<S: AsRef<str>>(primary: &str, secondaries: &[S]) -> Self {
        Self::new(
            SourceDescriptor::new(primary),
            secondaries
                .iter()
                .map(|s| SourceDescriptor::new(s.as_ref()))
                .collect(),
        )
    }

    pub fn primary(&self) -> &SourceDescriptor {
        &self.primary
    }

    pub fn secondaries(&self) -> &[SourceDescriptor] {
        &self.secondaries
    }

    /// Total number of remote sources.
    pub fn len(&self) -> usize {
        1 + self.secondaries.len()
    }

    /// Always false: a list has at least the primary.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Tier for the source at `position` in priority order.
    pub fn tier_of(position: usize) -> Tier {
        match position {
            0 => Tier::Primary,
            n => Tier::Secondary { index: n - 1 },
        }
    }

    /// Sources in strict priority order, paired with their tier.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &SourceDescriptor)> + '_ {
        std::iter::once(&self.primary)
            .chain(self.secondaries.iter())
            .enumerate()
            .map(|(i, s)| (Self::tier_of(i), s))
    }
}

/// Coarse classification used in logs and attempt records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connection,
    Parse,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Connection => write!(f, "connection_error"),
            FailureKind::Parse => write!(f, "parse_error"),
        }
    }
}

/// Why a single source produced no raw table.
///
/// All variants are recoverable: the resolver logs them and moves on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    #[error("timed out after {}s", timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed payload: {0}")]
    Parse(String),
}

impl SourceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SourceError::Timeout { .. } => FailureKind::Timeout,
            SourceError::Transport(_) => FailureKind::Connection,
            SourceError::Parse(_) => FailureKind::Parse,
        }
    }

    /// Timeouts and transport errors; parse errors are not network failures.
    pub fn is_network(&self) -> bool {
        !matches!(self, SourceError::Parse(_))
    }
}

/// Network capability: one request, one body.
///
/// Implementations must not retry; moving to the next source is the
/// resolver's job.
pub trait Fetcher: Send + Sync {
    /// Human-readable name of this fetcher.
    fn name(&self) -> &str;

    /// Fetch the body at `url` as text, giving up after `timeout`.
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, SourceError>;
}
