//! `auction-core` — shared building blocks for the auction ledger.
//!
//! This crate contains **pure domain** primitives (no file or HTTP concerns).

pub mod error;
pub mod value_object;

pub use error::{LedgerError, LedgerResult, Missing};
pub use value_object::{
    Nationality, POOL_SHEET, SalePrice, TeamCode, is_indian, require_text,
};
