//! HTTP API application wiring (Axum router + ledger wiring).
//!
//! - `services.rs`: ledger construction and the blocking-pool bridge
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and their mapping onto ledger commands
//! - `errors.rs`: consistent error responses

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Router {
    router(services::file_ledger(config))
}

/// Router over an already-built ledger.
pub fn router(ledger: services::SharedLedger) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(ledger))
        .layer(ServiceBuilder::new())
}
