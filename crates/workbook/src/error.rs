use std::path::PathBuf;

use auction_core::LedgerError;
use thiserror::Error;

/// Storage failure while reading or writing the workbook or summary files.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    #[error("lock poisoned")]
    Poisoned,
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        LedgerError::storage(err.to_string())
    }
}
