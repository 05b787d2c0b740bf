//! Data sources, raw tables, schema normalization and persistence

pub mod http;
pub mod normalize;
pub mod persist;
pub mod raw_table;
pub mod resolver;
pub mod sample;
pub mod schema;
pub mod source;

pub use http::HttpFetcher;
pub use normalize::{Normalizer, SchemaError, Strategy};
pub use persist::{write_csv, PersistError};
pub use raw_table::{ColumnKind, RawColumn, RawTable};
pub use resolver::{SourceAttempt, SourceResolver};
pub use sample::sample_table;
pub use schema::{CanonicalRecord, CanonicalTable, CANONICAL_COLUMNS};
pub use source::{FailureKind, Fetcher, SourceDescriptor, SourceError, SourceList, Tier};
