use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::dto::{self, AddPlayer};
use crate::app::errors;
use crate::app::services::{self, SharedLedger};

pub async fn add_player(
    Extension(ledger): Extension<SharedLedger>,
    Json(body): Json<dto::AddPlayerRequest>,
) -> axum::response::Response {
    let command = match body.into_command() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "add-player rejected");
            return errors::ledger_error_to_response(e);
        }
    };

    let result = services::run_blocking(ledger, move |ledger| match &command {
        AddPlayer::Sold(sale) => ledger.sell(sale).map(|_| ()),
        AddPlayer::Unsold(entry) => ledger.return_to_unsold(entry),
    })
    .await;
    if let Err(resp) = result {
        return resp;
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "success",
            "message": "Player added successfully.",
        })),
    )
        .into_response()
}

pub async fn remove_player(
    Extension(ledger): Extension<SharedLedger>,
    Json(body): Json<dto::RemovePlayerRequest>,
) -> axum::response::Response {
    let removal = match body.into_removal() {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "remove-player rejected");
            return errors::ledger_error_to_response(e);
        }
    };

    let message = format!(
        "Player '{}' moved from {} to Unsold and sheets sorted.",
        removal.entry.player, removal.sheet
    );
    if let Err(resp) = services::run_blocking(ledger, move |ledger| ledger.remove_player(&removal)).await {
        return resp;
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "success", "message": message })),
    )
        .into_response()
}
