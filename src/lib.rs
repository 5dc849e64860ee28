//! Netstat agent — per-TCP-state and UDP socket counts exposed as namespaced metrics.
//!
//! Modular structure:
//! - [`collectors`] — OS connection enumeration (procfs socket tables)
//! - [`stats`] — Aggregation into the fixed 13-key catalog
//! - [`namespace`] — Metric namespaces and nested-map resolution
//! - [`netstat`] — Catalog listing and collection for the metrics host
//! - [`logging`] — Structured JSON logging and metric lines

pub mod config;
pub mod error;
pub mod collectors;
pub mod stats;
pub mod namespace;
pub mod netstat;
pub mod logging;

pub use config::AgentConfig;
pub use collectors::{Connection, ConnectionSource, ProcNetSource, TcpState, Transport};
pub use error::{CollectError, EnumerationError, ResolutionError};
pub use namespace::{MetricMap, MetricValue, Namespace};
pub use netstat::{Metric, NetstatCollector, PluginMeta};
pub use stats::{StatAggregator, StatKey, StatSnapshot};
pub use logging::StructuredLogger;
