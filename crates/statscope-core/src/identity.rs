//! Base metric identity: name segments plus declared kind.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatscopeError};

/// Declared kind of a base metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// Immutable identity of one base metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricIdentity {
    segments: Vec<String>,
    kind: MetricKind,
}

impl MetricIdentity {
    /// Build an identity. At least one segment is required and no segment may be empty.
    pub fn new<I, S>(segments: I, kind: MetricKind) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(StatscopeError::BadRequest(
                "metric name must have at least one segment".into(),
            ));
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(StatscopeError::BadRequest(format!(
                "metric name has an empty segment: {segments:?}"
            )));
        }
        Ok(Self { segments, kind })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Join the name segments with the configured separator.
    pub fn flat_name(&self, separator: char) -> String {
        let mut buf = [0u8; 4];
        self.segments.join(&*separator.encode_utf8(&mut buf))
    }
}
