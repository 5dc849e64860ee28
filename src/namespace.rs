//! Metric namespaces and lookup of values inside nested metric maps.

use crate::error::ResolutionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SEPARATOR: char = '/';

pub type MetricMap = BTreeMap<String, MetricValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Map(MetricMap),
}

/// Ordered name segments, e.g. `staples/procfs/netstat/tcp_listen`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(Vec<String>);

impl Namespace {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Split on `/`, ignoring empty segments (leading slash, doubled separators).
    pub fn parse(s: &str) -> Self {
        Self::new(s.split(SEPARATOR).filter(|seg| !seg.is_empty()))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Segments after the first `n`; empty when the namespace is no longer than `n`.
    pub fn tail(&self, n: usize) -> &[String] {
        self.0.get(n..).unwrap_or(&[])
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(seg)?;
        }
        Ok(())
    }
}

/// Walk `path` through `map`. A non-map value met with segments still remaining
/// is an error (`NotAMapping`), not a silent miss.
pub fn resolve<'m, S: AsRef<str>>(map: &'m MetricMap, path: &[S]) -> Result<&'m MetricValue, ResolutionError> {
    let (first, rest) = path.split_first().ok_or(ResolutionError::EmptyPath)?;
    let key = first.as_ref();
    let value = map.get(key).ok_or_else(|| ResolutionError::KeyNotFound { key: key.to_string() })?;
    if rest.is_empty() {
        return Ok(value);
    }
    match value {
        MetricValue::Map(inner) => resolve(inner, rest),
        MetricValue::Count(_) => Err(ResolutionError::NotAMapping { key: key.to_string() }),
    }
}
