//! Registry of base metrics (identity lookup by segment path).

use std::collections::HashMap;

use crate::error::{Result, StatscopeError};
use crate::identity::{MetricIdentity, MetricKind};

#[derive(Debug, Default)]
pub struct MetricCatalog {
    by_path: HashMap<Vec<String>, MetricIdentity>,
}

impl MetricCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a base metric. A segment path may only be declared once.
    pub fn register(&mut self, id: MetricIdentity) -> Result<()> {
        if let Some(existing) = self.by_path.get(id.segments()) {
            return Err(StatscopeError::BadRequest(format!(
                "metric {:?} already declared as {}",
                id.segments(),
                existing.kind().as_str()
            )));
        }
        tracing::debug!(metric = ?id.segments(), kind = id.kind().as_str(), "metric registered");
        self.by_path.insert(id.segments().to_vec(), id);
        Ok(())
    }

    pub fn declare<I, S>(&mut self, segments: I, kind: MetricKind) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(MetricIdentity::new(segments, kind)?)
    }

    pub fn resolve(&self, segments: &[String]) -> Result<MetricIdentity> {
        self.by_path
            .get(segments)
            .cloned()
            .ok_or_else(|| StatscopeError::NotFound(format!("metric {segments:?}")))
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}
