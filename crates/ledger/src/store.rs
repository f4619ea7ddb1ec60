//! Persistence of the workbook + summary pair.
//!
//! Both files are staged as temporaries before either is replaced, so all
//! serialization and bulk writes happen up front. The renames then run
//! workbook first; if the summary rename fails the previous workbook is put
//! back and the commit reports the error with both files unchanged.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use auction_workbook::{
    InMemoryWorkbookStore, StagedFile, StoreError, Workbook, WorkbookStore, XlsxFileStore,
    stage_xlsx,
};

use crate::summary::SummaryBook;

/// The set of documents one mutation wants written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Commit<'a> {
    pub workbook: Option<&'a Workbook>,
    pub summary: Option<&'a SummaryBook>,
}

impl<'a> Commit<'a> {
    pub fn workbook(workbook: &'a Workbook) -> Self {
        Self {
            workbook: Some(workbook),
            summary: None,
        }
    }

    pub fn summary(summary: &'a SummaryBook) -> Self {
        Self {
            workbook: None,
            summary: Some(summary),
        }
    }

    pub fn both(workbook: &'a Workbook, summary: &'a SummaryBook) -> Self {
        Self {
            workbook: Some(workbook),
            summary: Some(summary),
        }
    }
}

/// Durable state of the auction: one workbook and one summary document.
pub trait LedgerStore: Send + Sync {
    fn load_workbook(&self) -> Result<Workbook, StoreError>;
    fn load_summary(&self) -> Result<SummaryBook, StoreError>;

    /// Write every document in `commit`, all or nothing.
    fn commit(&self, commit: Commit<'_>) -> Result<(), StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn load_workbook(&self) -> Result<Workbook, StoreError> {
        (**self).load_workbook()
    }

    fn load_summary(&self) -> Result<SummaryBook, StoreError> {
        (**self).load_summary()
    }

    fn commit(&self, commit: Commit<'_>) -> Result<(), StoreError> {
        (**self).commit(commit)
    }
}

/// `Auction_Sheet.xlsx` + `teams.json` on disk.
#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    workbook: XlsxFileStore,
    summary_path: PathBuf,
}

impl FileLedgerStore {
    pub fn new(workbook_path: impl Into<PathBuf>, summary_path: impl Into<PathBuf>) -> Self {
        Self {
            workbook: XlsxFileStore::new(workbook_path),
            summary_path: summary_path.into(),
        }
    }

    pub fn workbook_path(&self) -> &Path {
        self.workbook.path()
    }

    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }

    fn restore_workbook(&self, previous: Option<Vec<u8>>) -> Result<(), StoreError> {
        match previous {
            Some(bytes) => StagedFile::write(self.workbook.path(), &bytes)?.commit(),
            None => Ok(fs::remove_file(self.workbook.path())?),
        }
    }
}

impl LedgerStore for FileLedgerStore {
    fn load_workbook(&self) -> Result<Workbook, StoreError> {
        self.workbook.load()
    }

    fn load_summary(&self) -> Result<SummaryBook, StoreError> {
        if !self.summary_path.exists() {
            return Err(StoreError::Missing(self.summary_path.clone()));
        }
        let bytes = fs::read(&self.summary_path)?;
        Ok(SummaryBook::from_json(&bytes)?)
    }

    fn commit(&self, commit: Commit<'_>) -> Result<(), StoreError> {
        let staged_workbook = commit
            .workbook
            .map(|wb| stage_xlsx(wb, self.workbook.path()))
            .transpose()?;
        let staged_summary = commit
            .summary
            .map(|s| StagedFile::write(&self.summary_path, &s.to_json_pretty()?))
            .transpose()?;

        match (staged_workbook, staged_summary) {
            (Some(workbook), Some(summary)) => {
                let previous = read_previous(workbook.target())?;
                workbook.commit()?;
                if let Err(err) = summary.commit() {
                    tracing::warn!(error = %err, "summary commit failed; restoring previous workbook");
                    if let Err(restore_err) = self.restore_workbook(previous) {
                        tracing::error!(error = %restore_err, "workbook restore failed");
                    }
                    return Err(err);
                }
            }
            (Some(workbook), None) => workbook.commit()?,
            (None, Some(summary)) => summary.commit()?,
            (None, None) => {}
        }

        tracing::debug!(
            workbook = commit.workbook.is_some(),
            summary = commit.summary.is_some(),
            "ledger committed"
        );
        Ok(())
    }
}

/// Current bytes at `path`, or `None` when there is no file yet.
fn read_previous(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// In-memory ledger store.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    workbook: InMemoryWorkbookStore,
    summary: RwLock<Option<SummaryBook>>,
}

impl InMemoryLedgerStore {
    pub fn new(workbook: Workbook, summary: SummaryBook) -> Self {
        Self {
            workbook: InMemoryWorkbookStore::with_workbook(workbook),
            summary: RwLock::new(Some(summary)),
        }
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load_workbook(&self) -> Result<Workbook, StoreError> {
        self.workbook.load()
    }

    fn load_summary(&self) -> Result<SummaryBook, StoreError> {
        let guard = self.summary.read().map_err(|_| StoreError::Poisoned)?;
        guard
            .clone()
            .ok_or_else(|| StoreError::Missing(PathBuf::from("<memory>")))
    }

    fn commit(&self, commit: Commit<'_>) -> Result<(), StoreError> {
        let mut summary = self.summary.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(wb) = commit.workbook {
            self.workbook.save(wb)?;
        }
        if let Some(s) = commit.summary {
            *summary = Some(s.clone());
        }
        Ok(())
    }
}
