//! Axum router wiring for the admin endpoints.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/admin/dtab.json", get(ops::dtab_json))
        .route("/admin/metric/expressions.json", get(ops::expressions_json))
        .with_state(state)
}
