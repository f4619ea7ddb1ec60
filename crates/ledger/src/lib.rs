//! Auction ledger: the rules that keep team sheets, the unsold pool and the
//! team summary consistent with each other.
//!
//! - [`mutator`]: sell / return-to-unsold / remove-and-return, in memory
//! - [`sorter`]: nationality ordering applied after every write
//! - [`summary`]: per-team purse and slot counters (`teams.json`)
//! - [`reconcile`]: batch recompute of the summary from the workbook
//! - [`projection`]: sheet → JSON rows for display
//! - [`store`]: two-document commit over the workbook and summary files
//! - [`service`]: the locked load → mutate → commit cycle

pub mod mutator;
pub mod projection;
pub mod reconcile;
pub mod service;
pub mod sorter;
pub mod store;
pub mod summary;

pub use mutator::{PoolEntry, Removal, Sale, SaleOutcome};
pub use projection::{RowObject, project};
pub use reconcile::{ReconcileReport, SeasonRules, TeamCounters, TeamReconciliation};
pub use service::{AuctionLedger, LedgerConfig};
pub use sorter::{sort_sheet, sort_workbook};
pub use store::{Commit, FileLedgerStore, InMemoryLedgerStore, LedgerStore};
pub use summary::{SummaryBook, TeamSummary};
