//! Structured logging and ndjson metric output.

mod format;

pub use format::{MetricLine, StructuredLogger};
