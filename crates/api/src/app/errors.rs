use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use auction_core::{LedgerError, Missing};

/// Map a ledger failure on a mutating route to an HTTP response.
///
/// A missing player is a 404; a missing sheet or team means the request
/// itself referenced something that does not exist, so it is a 400.
pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::Validation(msg) => {
            tracing::warn!(error = %msg, "request rejected");
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        LedgerError::NotFound(missing @ Missing::Player { .. }) => {
            tracing::warn!(error = %missing, "request rejected");
            json_error(StatusCode::NOT_FOUND, "not_found", missing.to_string())
        }
        LedgerError::NotFound(missing) => {
            tracing::warn!(error = %missing, "request rejected");
            json_error(StatusCode::BAD_REQUEST, "not_found", missing.to_string())
        }
        LedgerError::StorageUnavailable(msg) => {
            tracing::error!(error = %msg, "storage unavailable");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_unavailable", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
