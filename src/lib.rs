// src/lib.rs
// Public library surface for the aggregator binary and integration tests.

pub mod enrich;
pub mod fetch;
pub mod ingest;
pub mod sanitize;
pub mod sink;

// ---- Re-exports for stable public API ----
pub use fetch::{Accept, BodyFetcher, FetchError, HttpFetcher};
pub use ingest::types::{JobIndex, JobRecord, SourceKind, SourceSpec};
pub use sink::WriteOutcome;
