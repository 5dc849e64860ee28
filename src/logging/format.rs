//! JSON log lines: one JSON object per line (ndjson) for the tracing stream and for metric output.

use crate::netstat::Metric;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// One collected (or catalogued) metric as written to the output stream.
#[derive(Serialize)]
pub struct MetricLine<'a> {
    pub ts: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> MetricLine<'a> {
    pub fn from_metric(metric: &'a Metric, version: u32) -> Self {
        Self {
            ts: metric.timestamp.to_rfc3339(),
            namespace: metric.namespace.to_string(),
            value: metric.data,
            host: metric.tags.get(crate::netstat::HOST_TAG).map(String::as_str),
            version: Some(version),
            error: None,
        }
    }

    /// A metric that could not be resolved in partial-results mode.
    pub fn failed(namespace: String, ts: String, error: &'a str) -> Self {
        Self {
            ts,
            namespace,
            value: None,
            host: None,
            version: None,
            error: Some(error),
        }
    }
}

/// Initialize tracing with JSON format (one JSON object per line)
pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber: JSON lines to stderr, level from RUST_LOG or default.
    /// Stdout is left to metric output.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    /// Emit a single structured line (e.g. a metric reading) without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(w, "{}", line)
    }
}
