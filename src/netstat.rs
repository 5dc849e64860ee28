//! Netstat metric collector: catalog discovery and namespace-addressed collection.
//!
//! Every call enumerates and aggregates from scratch; nothing is cached between calls.

use crate::collectors::ConnectionSource;
use crate::config::NamespaceConfig;
use crate::error::{CollectError, EnumerationError, ResolutionError};
use crate::namespace::{self, MetricMap, MetricValue, Namespace};
use crate::stats::{StatAggregator, StatKey, StatSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const PLUGIN_NAME: &str = "netstat";
pub const PLUGIN_VERSION: u32 = 1;

/// Tag carrying the host name on every metric.
pub const HOST_TAG: &str = "plugin_running_on";

/// Identity of the metric catalog exposed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMeta {
    pub name: String,
    pub version: u32,
}

impl Default for PluginMeta {
    fn default() -> Self {
        Self {
            name: PLUGIN_NAME.to_string(),
            version: PLUGIN_VERSION,
        }
    }
}

/// A catalog entry (`data` unset) or a collected reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub namespace: Namespace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<u64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

pub struct NetstatCollector<S> {
    source: S,
    aggregator: StatAggregator,
    prefix: Namespace,
    tags: BTreeMap<String, String>,
}

impl<S: ConnectionSource> NetstatCollector<S> {
    pub fn new(source: S, namespace: &NamespaceConfig) -> Self {
        Self {
            source,
            aggregator: StatAggregator::new(),
            prefix: namespace.prefix(),
            tags: BTreeMap::new(),
        }
    }

    /// Tag the host name onto every metric (via sysinfo).
    pub fn with_host_tag(mut self) -> Self {
        match sysinfo::System::host_name() {
            Some(host) => {
                self.tags.insert(HOST_TAG.to_string(), host);
            }
            None => warn!("host name unavailable; metrics go untagged"),
        }
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn prefix(&self) -> &Namespace {
        &self.prefix
    }

    /// Enumerate then aggregate.
    pub fn snapshot(&self) -> Result<StatSnapshot, EnumerationError> {
        let connections = self.source.connections()?;
        Ok(self.aggregator.aggregate(&connections))
    }

    /// Names of every available metric. Fails only when enumeration fails.
    pub fn metric_names(&self) -> Result<Vec<String>, CollectError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.iter().map(|(k, _)| k.as_str().to_string()).collect())
    }

    /// Catalog as full namespaces with no data attached.
    pub fn metric_types(&self) -> Result<Vec<Metric>, CollectError> {
        let names = self.metric_names()?;
        let now = Utc::now();
        Ok(names
            .into_iter()
            .map(|name| Metric {
                namespace: self.prefix.child(name),
                data: None,
                timestamp: now,
                tags: self.tags.clone(),
            })
            .collect())
    }

    /// Resolve every requested namespace against one fresh snapshot.
    /// Fails the whole batch on the first error.
    pub fn collect(&self, requested: &[Namespace]) -> Result<Vec<Metric>, CollectError> {
        let fields = self.snapshot()?.to_map();
        let now = Utc::now();
        let metrics = requested
            .iter()
            .map(|ns| self.read(&fields, ns, now))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = metrics.len(), "collected metrics");
        Ok(metrics)
    }

    /// Like [`collect`](Self::collect) but keeps going past resolution errors,
    /// returning one result per request. Enumeration failure still aborts.
    pub fn collect_partial(
        &self,
        requested: &[Namespace],
    ) -> Result<Vec<Result<Metric, ResolutionError>>, EnumerationError> {
        let fields = self.snapshot()?.to_map();
        let now = Utc::now();
        let results: Vec<_> = requested.iter().map(|ns| self.read(&fields, ns, now)).collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = results.len(), "some metrics could not be resolved");
        }
        Ok(results)
    }

    /// A path ending on a nested map names a group, not a metric, and reads as
    /// missing. The flat snapshot never produces one.
    fn read(&self, fields: &MetricMap, ns: &Namespace, now: DateTime<Utc>) -> Result<Metric, ResolutionError> {
        let data = match namespace::resolve(fields, ns.tail(self.prefix.len()))? {
            MetricValue::Count(v) => *v,
            MetricValue::Map(_) => {
                let key = ns.segments().last().cloned().unwrap_or_default();
                return Err(ResolutionError::KeyNotFound { key });
            }
        };
        Ok(Metric {
            namespace: ns.clone(),
            data: Some(data),
            timestamp: now,
            tags: self.tags.clone(),
        })
    }

    /// Full namespace for a catalog key.
    pub fn namespace_for(&self, key: StatKey) -> Namespace {
        self.prefix.child(key.as_str())
    }
}
