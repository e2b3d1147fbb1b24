//! Admin HTTP endpoints.
//!
//! - `/healthz`                          : liveness
//! - `/metrics`                          : Prometheus text format
//! - `/admin/dtab.json`                  : delegation table
//! - `/admin/metric/expressions.json`    : registered metric expressions

pub mod dtab;
pub mod expressions;

use axum::extract::State;
use axum::{http::StatusCode, response::{IntoResponse, Response}};

use crate::app_state::AppState;

pub use dtab::dtab_json;
pub use expressions::expressions_json;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let extra = state.metrics_extra();
    let body = state.metrics().render(&extra);

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
