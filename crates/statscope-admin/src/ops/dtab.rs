use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct DtabResponse {
    pub dtab: Vec<String>,
}

/// Dump the configured delegation table, one `prefix=>dst` string per entry.
pub async fn dtab_json(State(state): State<AppState>) -> Json<DtabResponse> {
    state.metrics().requests.inc(&[("endpoint", "dtab")]);
    Json(DtabResponse { dtab: state.dtab().show() })
}
