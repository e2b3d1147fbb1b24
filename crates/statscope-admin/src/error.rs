//! HTTP mapping for `StatscopeError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use statscope_core::error::{ClientCode, StatscopeError};
use thiserror::Error;

/// Handler error: renders as `{"error": {"code": ..., "msg": ...}}`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub StatscopeError);

fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let body = json!({
            "error": {
                "code": code.as_str(),
                "msg": self.0.to_string(),
            }
        });
        (status_for(code), Json(body)).into_response()
    }
}
