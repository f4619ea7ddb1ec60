use axum::{
    routing::{get, post},
    Router,
};

pub mod players;
pub mod sheets;
pub mod summary;
pub mod system;

/// Router for every auction endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/add-player", post(players::add_player))
        .route("/remove-player", post(players::remove_player))
        .route("/fetch-tab", post(sheets::fetch_tab))
        .route("/auction-summary", get(summary::summary_json))
        .route("/auction-summary-page", get(summary::summary_page))
        .route(
            "/reconcile",
            get(summary::reconcile_preview).post(summary::reconcile_apply),
        )
}
