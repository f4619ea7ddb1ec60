//! Auction ledger service: one load → mutate → commit cycle per call.
//!
//! Every mutation runs under a single write lock, so two requests in the same
//! process can never interleave their load and commit. Reads take no lock;
//! files are replaced by rename, so a reader sees either the old or new state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use auction_core::{LedgerError, LedgerResult};

use crate::mutator::{self, PoolEntry, Removal, Sale, SaleOutcome};
use crate::projection::{self, RowObject};
use crate::reconcile::{self, ReconcileReport, SeasonRules};
use crate::store::{Commit, LedgerStore};
use crate::summary::SummaryBook;

/// Tunables for the ledger rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerConfig {
    pub season: SeasonRules,
    /// Reject sales that would overdraw the purse or a slot allocation.
    pub enforce_capacity: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            season: SeasonRules::default(),
            enforce_capacity: true,
        }
    }
}

pub struct AuctionLedger<S> {
    store: S,
    config: LedgerConfig,
    write_lock: Mutex<()>,
}

impl<S: LedgerStore> AuctionLedger<S> {
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Poisoning is ignored: the lock guards no data.
    fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a sale and debit the team's summary.
    pub fn sell(&self, sale: &Sale) -> LedgerResult<SaleOutcome> {
        let _guard = self.write_guard();
        let mut workbook = self.store.load_workbook()?;
        let mut summary = self.store.load_summary()?;

        let outcome = mutator::sell(
            &mut workbook,
            &mut summary,
            sale,
            self.config.enforce_capacity,
        )?;
        self.store.commit(Commit::both(&workbook, &summary))?;

        tracing::info!(
            player = %sale.player,
            team = %outcome.team_key,
            sheet = %outcome.sheet,
            price = sale.price.amount(),
            removed_from_pool = outcome.removed_from_pool,
            "player sold"
        );
        Ok(outcome)
    }

    /// Put a player into the pool sheet at an asking price.
    pub fn return_to_unsold(&self, entry: &PoolEntry) -> LedgerResult<()> {
        let _guard = self.write_guard();
        let mut workbook = self.store.load_workbook()?;

        mutator::return_to_pool(&mut workbook, entry)?;
        self.store.commit(Commit::workbook(&workbook))?;

        tracing::info!(
            player = %entry.player,
            base_price = entry.base_price.amount(),
            "player marked unsold"
        );
        Ok(())
    }

    /// Move a player from a sheet back to the pool, optionally refunding the sale.
    pub fn remove_player(&self, removal: &Removal) -> LedgerResult<()> {
        let _guard = self.write_guard();
        let mut workbook = self.store.load_workbook()?;
        let mut summary = if removal.refund {
            self.store.load_summary()?
        } else {
            SummaryBook::new()
        };

        mutator::remove_and_return(&mut workbook, &mut summary, removal)?;
        let commit = if removal.refund {
            Commit::both(&workbook, &summary)
        } else {
            Commit::workbook(&workbook)
        };
        self.store.commit(commit)?;

        tracing::info!(
            player = %removal.entry.player,
            sheet = %removal.sheet,
            refund = removal.refund,
            "player returned to pool"
        );
        Ok(())
    }

    /// Project one sheet into display rows.
    pub fn fetch_sheet(&self, name: &str) -> LedgerResult<Vec<RowObject>> {
        let workbook = self.store.load_workbook()?;
        let sheet = workbook
            .sheet(name)
            .ok_or_else(|| LedgerError::missing_sheet(name))?;
        Ok(projection::project(sheet))
    }

    pub fn summary(&self) -> LedgerResult<SummaryBook> {
        Ok(self.store.load_summary()?)
    }

    /// Compare the summary with the workbook without changing anything.
    pub fn reconcile_preview(&self) -> LedgerResult<ReconcileReport> {
        let workbook = self.store.load_workbook()?;
        let summary = self.store.load_summary()?;
        Ok(reconcile::reconcile(&workbook, &summary, &self.config.season))
    }

    /// Rewrite drifted team counters from the workbook.
    pub fn reconcile_apply(&self) -> LedgerResult<ReconcileReport> {
        let _guard = self.write_guard();
        let workbook = self.store.load_workbook()?;
        let mut summary = self.store.load_summary()?;

        let mut report = reconcile::reconcile(&workbook, &summary, &self.config.season);
        let changed = reconcile::apply(&mut summary, &report);
        if changed > 0 {
            self.store.commit(Commit::summary(&summary))?;
            tracing::warn!(teams = changed, "summary repaired from workbook");
        }
        report.applied = true;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use super::*;
    use crate::store::{FileLedgerStore, InMemoryLedgerStore};
    use crate::summary::TeamSummary;
    use auction_core::POOL_SHEET;
    use auction_workbook::{CellValue, Sheet, Workbook};

    fn team_header() -> Vec<CellValue> {
        vec![
            "Player Name".into(),
            "Sold For".into(),
            "Speciality".into(),
            "Nationality".into(),
        ]
    }

    fn seed_workbook() -> Workbook {
        Workbook::with_sheets(vec![
            Sheet::with_rows(
                POOL_SHEET,
                vec![
                    vec!["Player Name".into(), "Base Price".into()],
                    vec!["Raj".into(), 100.0.into()],
                ],
            ),
            Sheet::with_rows("Team Alpha", vec![team_header()]),
        ])
    }

    fn seed_summary() -> SummaryBook {
        SummaryBook::with_teams(vec![(
            "Team Alpha (TA)".to_string(),
            TeamSummary::new(1000.0, 5, 3),
        )])
    }

    fn raj_sale() -> Sale {
        Sale::new(
            Some("Raj"),
            Some("TA"),
            Some(150.0),
            Some("Bowler"),
            Some("Indian"),
        )
        .unwrap()
    }

    fn config() -> LedgerConfig {
        LedgerConfig {
            season: SeasonRules {
                initial_purse: 1000.0,
                indian_slots: 5,
                overseas_slots: 3,
            },
            enforce_capacity: true,
        }
    }

    fn file_ledger(dir: &tempfile::TempDir) -> AuctionLedger<FileLedgerStore> {
        let store = FileLedgerStore::new(
            dir.path().join("Auction_Sheet.xlsx"),
            dir.path().join("teams.json"),
        );
        store
            .commit(Commit::both(&seed_workbook(), &seed_summary()))
            .unwrap();
        AuctionLedger::new(store, config())
    }

    #[test]
    fn sell_end_to_end_on_files() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = file_ledger(&dir);

        ledger.sell(&raj_sale()).unwrap();

        let pool = ledger.fetch_sheet(POOL_SHEET).unwrap();
        assert!(pool.is_empty());
        let team = ledger.fetch_sheet("Team Alpha").unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0]["Player Name"], "Raj");
        assert_eq!(team[0]["Sold For"], 150);
        assert_eq!(team[0]["Speciality"], "Bowler");
        assert_eq!(team[0]["Nationality"], "Indian");

        let summary = ledger.summary().unwrap();
        let alpha = summary.get("Team Alpha (TA)").unwrap();
        assert_eq!(alpha.purse_remaining, 850.0);
        assert_eq!(alpha.slots_filled, 1);
        assert_eq!(alpha.indian_slots_remaining, 4);
        assert_eq!(alpha.overseas_slots_remaining, 3);
    }

    #[test]
    fn failed_sell_leaves_both_files_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = file_ledger(&dir);
        let wb_before = fs::read(ledger.store().workbook_path()).unwrap();
        let summary_before = fs::read(ledger.store().summary_path()).unwrap();

        let unknown_team = Sale::new(
            Some("Raj"),
            Some("ZZ"),
            Some(150.0),
            Some("Bowler"),
            Some("Indian"),
        )
        .unwrap();
        assert!(matches!(
            ledger.sell(&unknown_team),
            Err(LedgerError::NotFound(_))
        ));

        let over_budget = Sale::new(
            Some("Raj"),
            Some("TA"),
            Some(5000.0),
            Some("Bowler"),
            Some("Indian"),
        )
        .unwrap();
        assert!(matches!(
            ledger.sell(&over_budget),
            Err(LedgerError::Validation(_))
        ));

        assert_eq!(fs::read(ledger.store().workbook_path()).unwrap(), wb_before);
        assert_eq!(fs::read(ledger.store().summary_path()).unwrap(), summary_before);
    }

    #[test]
    fn unsold_touches_only_the_pool_sheet() {
        let store = Arc::new(InMemoryLedgerStore::new(seed_workbook(), seed_summary()));
        let ledger = AuctionLedger::new(store.clone(), config());

        let entry = PoolEntry::new(Some("Ben"), Some(40.0)).unwrap();
        ledger.return_to_unsold(&entry).unwrap();

        let pool = ledger.fetch_sheet(POOL_SHEET).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[1]["Player Name"], "Ben");
        assert_eq!(pool[1]["Base Price"], 40);
        assert_eq!(store.load_summary().unwrap(), seed_summary());
    }

    #[test]
    fn remove_without_refund_keeps_summary_and_with_refund_restores_it() {
        let store = Arc::new(InMemoryLedgerStore::new(seed_workbook(), seed_summary()));
        let ledger = AuctionLedger::new(store.clone(), config());
        ledger.sell(&raj_sale()).unwrap();
        let after_sale = store.load_summary().unwrap();

        let removal = Removal::new(Some("Team Alpha"), Some("Raj"), Some(100.0), false).unwrap();
        ledger.remove_player(&removal).unwrap();
        assert_eq!(store.load_summary().unwrap(), after_sale);

        ledger.sell(&raj_sale()).unwrap();
        let refund = Removal::new(Some("Team Alpha"), Some("Raj"), Some(100.0), true).unwrap();
        ledger.remove_player(&refund).unwrap();
        let alpha = store.load_summary().unwrap();
        assert_eq!(alpha.get("Team Alpha (TA)").unwrap().slots_filled, 1);
        assert_eq!(alpha.get("Team Alpha (TA)").unwrap().purse_remaining, 850.0);
    }

    #[test]
    fn reconcile_apply_repairs_the_drift_left_by_a_plain_remove() {
        let store = Arc::new(InMemoryLedgerStore::new(seed_workbook(), seed_summary()));
        let ledger = AuctionLedger::new(store.clone(), config());
        ledger.sell(&raj_sale()).unwrap();
        let removal = Removal::new(Some("Team Alpha"), Some("Raj"), Some(100.0), false).unwrap();
        ledger.remove_player(&removal).unwrap();

        assert_eq!(ledger.reconcile_preview().unwrap().drifted, 1);
        let report = ledger.reconcile_apply().unwrap();
        assert!(report.applied);
        assert_eq!(store.load_summary().unwrap(), seed_summary());
        assert_eq!(ledger.reconcile_preview().unwrap().drifted, 0);
    }

    #[test]
    fn fetch_of_unknown_sheet_is_not_found() {
        let store = InMemoryLedgerStore::new(seed_workbook(), seed_summary());
        let ledger = AuctionLedger::new(store, config());
        assert_eq!(
            ledger.fetch_sheet("Team Omega").unwrap_err(),
            LedgerError::missing_sheet("Team Omega")
        );
    }

    #[test]
    fn concurrent_sales_are_serialized() {
        let mut summary = seed_summary();
        summary.get_mut("Team Alpha (TA)").unwrap().overseas_slots_remaining = 20;
        let store = Arc::new(InMemoryLedgerStore::new(seed_workbook(), summary));
        let ledger = Arc::new(AuctionLedger::new(store.clone(), config()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ledger = ledger.clone();
                std::thread::spawn(move || {
                    let name = format!("Player {i}");
                    let sale = Sale::new(
                        Some(name.as_str()),
                        Some("TA"),
                        Some(10.0),
                        Some("Batter"),
                        Some("English"),
                    )
                    .unwrap();
                    ledger.sell(&sale).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let alpha = store.load_summary().unwrap();
        let alpha = alpha.get("Team Alpha (TA)").unwrap();
        assert_eq!(alpha.slots_filled, 8);
        assert_eq!(alpha.purse_remaining, 920.0);
        assert_eq!(ledger.fetch_sheet("Team Alpha").unwrap().len(), 8);
    }

    #[test]
    fn panicked_writer_does_not_block_later_sales() {
        let store = Arc::new(InMemoryLedgerStore::new(seed_workbook(), seed_summary()));
        let ledger = Arc::new(AuctionLedger::new(store.clone(), config()));

        let holder = ledger.clone();
        let result = std::thread::spawn(move || {
            let _guard = holder.write_lock.lock().unwrap();
            panic!("writer died mid-mutation");
        })
        .join();
        assert!(result.is_err());
        assert!(ledger.write_lock.is_poisoned());

        ledger.sell(&raj_sale()).unwrap();
        assert_eq!(store.load_summary().unwrap().get("Team Alpha (TA)").unwrap().slots_filled, 1);
    }
}
