use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use auction_core::LedgerError;

use crate::app::dto;
use crate::app::errors;
use crate::app::services::SharedLedger;

/// Rows of one sheet as JSON objects. An unknown sheet is a 404 here.
pub async fn fetch_tab(
    Extension(ledger): Extension<SharedLedger>,
    Json(body): Json<dto::FetchTabRequest>,
) -> axum::response::Response {
    let name = match body.sheet_name {
        Some(n) if !n.trim().is_empty() => n,
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "sheet_name is required",
            );
        }
    };

    let result = tokio::task::spawn_blocking(move || ledger.fetch_sheet(&name)).await;
    match result {
        Ok(Ok(rows)) => (StatusCode::OK, Json(rows)).into_response(),
        Ok(Err(LedgerError::NotFound(missing))) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", missing.to_string())
        }
        Ok(Err(e)) => errors::ledger_error_to_response(e),
        Err(join_err) => {
            tracing::error!(error = %join_err, "fetch-tab task failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "ledger task failed",
            )
        }
    }
}
