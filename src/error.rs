use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::models::RecordKey;

/// Rejected signal values. These never reach a renderer.
#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("column '{0}' cannot drive the histogram")]
    UnknownColumn(String),
    #[error("no member with key {0}")]
    UnknownRecord(RecordKey),
    #[error("row {row} is outside the {len} loaded members")]
    RowOutOfRange { row: usize, len: usize },
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "rejected dashboard request");
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
