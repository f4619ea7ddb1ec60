//! Ledger wiring shared by the route handlers.

use std::sync::Arc;

use axum::http::StatusCode;

use auction_core::LedgerResult;
use auction_ledger::{AuctionLedger, FileLedgerStore, LedgerStore};

use crate::app::errors;
use crate::config::AppConfig;

pub type Ledger = AuctionLedger<Arc<dyn LedgerStore>>;
pub type SharedLedger = Arc<Ledger>;

/// Ledger over the workbook and summary files named in the config.
pub fn file_ledger(config: &AppConfig) -> SharedLedger {
    let store: Arc<dyn LedgerStore> = Arc::new(FileLedgerStore::new(
        config.workbook_path.clone(),
        config.teams_path.clone(),
    ));
    Arc::new(AuctionLedger::new(store, config.ledger))
}

/// Run a ledger call on the blocking pool; file I/O never runs on the reactor.
pub async fn run_blocking<T, F>(ledger: SharedLedger, f: F) -> Result<T, axum::response::Response>
where
    T: Send + 'static,
    F: FnOnce(&Ledger) -> LedgerResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || f(ledger.as_ref())).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(errors::ledger_error_to_response(err)),
        Err(join_err) => {
            tracing::error!(error = %join_err, "ledger task failed");
            Err(errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "ledger task failed",
            ))
        }
    }
}
