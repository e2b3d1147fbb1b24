//! Shared application state for the admin server.
//!
//! Built once from config: declared metrics go into the catalog, expression
//! declarations are resolved against it and registered, and the dtab is
//! parsed. Startup errors surface as `Result` instead of panics.

use std::sync::Arc;

use statscope_core::catalog::MetricCatalog;
use statscope_core::error::{Result, StatscopeError};
use statscope_core::schema::ExpressionSchema;
use statscope_core::{MetricIdentity, Translator};

use crate::config::AdminConfig;
use crate::dtab::Dtab;
use crate::obs::metrics::AdminMetrics;
use crate::registry::ExpressionRegistry;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AdminConfig,
    catalog: MetricCatalog,
    registry: ExpressionRegistry,
    dtab: Dtab,
    metrics: AdminMetrics,
}

impl AppState {
    pub fn new(cfg: AdminConfig) -> Result<Self> {
        // 1) Base metrics
        let mut catalog = MetricCatalog::new();
        for m in &cfg.metrics {
            catalog.register(MetricIdentity::new(m.name.iter().cloned(), m.kind)?)?;
        }

        // 2) Expressions, resolved against the catalog
        let mut registry = ExpressionRegistry::new();
        for decl in &cfg.expressions {
            let expr = decl.expr.resolve(&catalog).map_err(|e| {
                StatscopeError::BadRequest(format!("expression {}: {e}", decl.name))
            })?;
            let schema = ExpressionSchema::builder(decl.name.clone(), expr)
                .namespace(decl.namespace.clone())
                .labels(decl.labels.clone())
                .bounds(decl.bounds.clone())
                .description(decl.description.clone())
                .unit(decl.unit.clone())
                .build()?;
            registry.register(schema);
        }

        // 3) Delegation table
        let dtab = Dtab::parse(&cfg.dtab)?;

        tracing::info!(
            metrics = catalog.len(),
            expressions = registry.len(),
            dentries = dtab.dentries().len(),
            "admin state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                catalog,
                registry,
                dtab,
                metrics: AdminMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &AdminConfig {
        &self.inner.cfg
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.inner.catalog
    }

    pub fn registry(&self) -> &ExpressionRegistry {
        &self.inner.registry
    }

    pub fn dtab(&self) -> &Dtab {
        &self.inner.dtab
    }

    pub fn metrics(&self) -> &AdminMetrics {
        &self.inner.metrics
    }

    pub fn counters_latched(&self) -> bool {
        self.inner.cfg.admin.counters_latched
    }

    pub fn separator(&self) -> char {
        self.inner.cfg.admin.separator()
    }

    /// Translator bound to the configured stats format and separator.
    pub fn translator(&self) -> Translator<'static> {
        Translator::new(self.inner.cfg.admin.stats_format.formatter(), self.separator())
    }

    /// Gauge-style lines appended to `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("statscope_registered_metrics", self.catalog().len() as u64),
            ("statscope_registered_expressions", self.registry().len() as u64),
        ]
    }
}
