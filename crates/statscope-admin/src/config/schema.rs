use std::net::SocketAddr;

use serde::Deserialize;
use statscope_core::error::{Result, StatscopeError};
use statscope_core::schema::{Bounds, SchemaLabels, Unit};
use statscope_core::{MetricKind, StatsFormat};

use super::expr::ExprSpec;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    pub version: u32,

    #[serde(default)]
    pub admin: AdminSection,

    /// Delegation table in textual form (`/prefix => /dst; ...`).
    #[serde(default)]
    pub dtab: String,

    #[serde(default)]
    pub metrics: Vec<MetricDecl>,

    #[serde(default)]
    pub expressions: Vec<ExpressionDecl>,
}

impl AdminConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StatscopeError::UnsupportedVersion);
        }

        self.admin.validate()?;

        for e in &self.expressions {
            if e.name.is_empty() {
                return Err(StatscopeError::BadRequest(
                    "expressions[].name must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Joins metric name segments. Must be exactly one character.
    #[serde(default = "default_separator_char")]
    pub separator_char: String,

    /// Whether the metrics source already reports counters as per-interval deltas.
    #[serde(default)]
    pub counters_latched: bool,

    #[serde(default)]
    pub stats_format: StatsFormat,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            separator_char: default_separator_char(),
            counters_latched: false,
            stats_format: StatsFormat::default(),
        }
    }
}

impl AdminSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.separator_char.chars().count() != 1 {
            return Err(StatscopeError::BadRequest(format!(
                "admin.separator_char must be exactly one character, got {:?}",
                self.separator_char
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            StatscopeError::BadRequest(format!(
                "admin.listen must be a valid SocketAddr: {}",
                self.listen
            ))
        })
    }

    /// The validated separator; falls back to `/` only if `validate` was skipped.
    pub fn separator(&self) -> char {
        self.separator_char.chars().next().unwrap_or('/')
    }
}

fn default_listen() -> String {
    "0.0.0.0:9990".into()
}
fn default_separator_char() -> String {
    "/".into()
}

/// A base metric the expressions may reference.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricDecl {
    pub name: Vec<String>,
    pub kind: MetricKind,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpressionDecl {
    pub name: String,
    #[serde(default)]
    pub namespace: Vec<String>,
    #[serde(default)]
    pub labels: SchemaLabels,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit: Unit,
    /// Enum variants are written as single-key maps (`metric: [a, b]`).
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub expr: ExprSpec,
}
