// JSON error responses: { "error": ..., "status": ... }

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::aggregation::AggregateError;
use crate::models::MonthError;
use crate::node_source::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl From<MonthError> for ApiError {
    fn from(err: MonthError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Source(e) => {
                tracing::error!(error = %e, "node source failed");
                (StatusCode::BAD_GATEWAY, "upstream node source failed".to_string())
            }
            ApiError::Aggregate(e) => {
                tracing::error!(error = %e, "upstream sent malformed node tree");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}
