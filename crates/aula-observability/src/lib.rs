//! # aula-observability
//!
//! Structured tracing with span definitions, pipeline events (fusion,
//! degradation, contradictions, verdicts, session folds), and a bounded
//! per-query audit log.

pub mod query_log;
pub mod tracing_setup;

pub use query_log::{QueryLog, QueryLogEntry};
pub use tracing_setup::{init_tracing, init_tracing_from_config, init_tracing_with_filter};

#[doc(hidden)]
pub use tracing;
