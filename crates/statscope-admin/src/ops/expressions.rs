//! `/admin/metric/expressions.json`: registered expressions rendered as queries.
//!
//! Query parameters:
//! - `latching_style`: `true`/`1` asks for counters wrapped in `rate(...)`;
//!   ignored when the metrics source already latches counters.
//! - `name` (repeatable): exact expression name.
//! - `namespace` (repeatable): exact namespace, segments joined with `:`.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use statscope_core::error::StatscopeError;
use statscope_core::rate;
use statscope_core::schema::{Bounds, ExpressionSchema, Unit};
use statscope_core::Translator;

use crate::app_state::AppState;
use crate::error::ApiError;

/// Response format version.
pub const EXPRESSIONS_VERSION: f64 = 1.1;

/// Parsed query string. Unknown keys are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpressionQuery {
    pub latching_style: Option<String>,
    pub names: Vec<String>,
    pub namespaces: Vec<String>,
}

impl ExpressionQuery {
    /// Build from raw key/value pairs; repeated `name`/`namespace` accumulate
    /// and the last `latching_style` wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut q = Self::default();
        for (k, v) in pairs {
            match k.as_str() {
                "latching_style" => q.latching_style = Some(v),
                "name" => q.names.push(v),
                "namespace" => q.namespaces.push(v),
                _ => {}
            }
        }
        q
    }
}

#[derive(Debug, Serialize)]
pub struct RenderedSchema {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<String>>,
    pub expression: String,
    pub bounds: Bounds,
    pub description: String,
    pub unit: Unit,
}

impl RenderedSchema {
    fn new(schema: &ExpressionSchema, translator: &Translator<'_>, should_rate: bool) -> Self {
        let namespaces = if schema.namespace().is_empty() {
            None
        } else {
            Some(schema.namespace().to_vec())
        };
        Self {
            name: schema.name().to_string(),
            labels: schema.labels().to_map(),
            namespaces,
            expression: translator.translate(schema.expr(), should_rate),
            bounds: schema.bounds().clone(),
            description: schema.description().to_string(),
            unit: schema.unit().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExpressionsResponse {
    #[serde(rename = "@version")]
    pub version: f64,
    pub counters_latched: bool,
    pub separator_char: String,
    pub expressions: Vec<RenderedSchema>,
}

/// Filter the registry and translate every matching expression with one
/// rate decision for the whole request.
pub fn render_expressions(state: &AppState, query: &ExpressionQuery) -> ExpressionsResponse {
    let latched = state.counters_latched();
    let should_rate = rate::should_rate(query.latching_style.as_deref(), latched);
    let translator = state.translator();

    let expressions = state
        .registry()
        .filter(&query.names, &query.namespaces)
        .map(|s| RenderedSchema::new(s, &translator, should_rate))
        .collect();

    ExpressionsResponse {
        version: EXPRESSIONS_VERSION,
        counters_latched: latched,
        separator_char: translator.separator().to_string(),
        expressions,
    }
}

pub async fn expressions_json(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ExpressionsResponse>, ApiError> {
    state.metrics().requests.inc(&[("endpoint", "expressions")]);

    let Query(pairs) = query.map_err(|e| {
        tracing::warn!(error = %e, "rejected expressions query");
        StatscopeError::BadRequest(e.body_text())
    })?;
    let query = ExpressionQuery::from_pairs(pairs);

    let started = Instant::now();
    let resp = render_expressions(&state, &query);
    state.metrics().render_duration.observe(&[], started.elapsed());

    tracing::debug!(
        returned = resp.expressions.len(),
        names = query.names.len(),
        namespaces = query.namespaces.len(),
        "expressions rendered"
    );
    Ok(Json(resp))
}
