//! Workbook persistence boundary.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::{StoreError, Workbook};

/// Load/save a whole workbook.
///
/// Every call is a full read or full replace; implementations keep no
/// cached state between calls that callers could observe.
pub trait WorkbookStore: Send + Sync {
    fn load(&self) -> Result<Workbook, StoreError>;
    fn save(&self, workbook: &Workbook) -> Result<(), StoreError>;
}

impl<S> WorkbookStore for Arc<S>
where
    S: WorkbookStore + ?Sized,
{
    fn load(&self) -> Result<Workbook, StoreError> {
        (**self).load()
    }

    fn save(&self, workbook: &Workbook) -> Result<(), StoreError> {
        (**self).save(workbook)
    }
}

/// Workbook stored as an `.xlsx` file on disk.
#[derive(Debug, Clone)]
pub struct XlsxFileStore {
    path: PathBuf,
}

impl XlsxFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookStore for XlsxFileStore {
    fn load(&self) -> Result<Workbook, StoreError> {
        crate::load_xlsx(&self.path)
    }

    fn save(&self, workbook: &Workbook) -> Result<(), StoreError> {
        crate::save_xlsx(workbook, &self.path)
    }
}

/// In-memory workbook store.
///
/// Intended for tests/dev. An empty store behaves like a missing file.
#[derive(Debug, Default)]
pub struct InMemoryWorkbookStore {
    inner: RwLock<Option<Workbook>>,
}

impl InMemoryWorkbookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbook(workbook: Workbook) -> Self {
        Self {
            inner: RwLock::new(Some(workbook)),
        }
    }
}

impl WorkbookStore for InMemoryWorkbookStore {
    fn load(&self) -> Result<Workbook, StoreError> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        guard
            .clone()
            .ok_or_else(|| StoreError::Missing(PathBuf::from("<memory>")))
    }

    fn save(&self, workbook: &Workbook) -> Result<(), StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(workbook.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CellValue, Sheet};

    fn auction_workbook() -> Workbook {
        Workbook::with_sheets(vec![
            Sheet::with_rows(
                "Unsold",
                vec![
                    vec!["Player Name".into(), "Base Price".into()],
                    vec!["Raj".into(), 100.0.into()],
                ],
            ),
            Sheet::with_rows(
                "TA",
                vec![
                    vec![
                        "Player Name".into(),
                        "Sold For".into(),
                        "Speciality".into(),
                        "Nationality".into(),
                    ],
                    vec!["Sam".into(), 75.5.into(), "Batter".into(), "Indian".into()],
                    vec!["Kit".into(), CellValue::Empty, CellValue::Empty, "English".into()],
                ],
            ),
        ])
    }

    #[test]
    fn xlsx_file_round_trip_preserves_values_and_sheet_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = XlsxFileStore::new(dir.path().join("Auction_Sheet.xlsx"));
        let original = auction_workbook();

        store.save(&original).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.sheet_names(), vec!["Unsold", "TA"]);
        let ta = loaded.sheet("TA").unwrap();
        assert_eq!(ta.cell(1, 1), &CellValue::Number(75.5));
        assert_eq!(ta.cell(2, 1), &CellValue::Empty);
        assert_eq!(ta.cell(2, 3).as_text(), "English");
        assert_eq!(loaded.sheet("Unsold").unwrap().cell(1, 0).as_text(), "Raj");
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = XlsxFileStore::new(dir.path().join("nope.xlsx"));
        assert!(matches!(store.load(), Err(StoreError::Missing(_))));
    }

    #[test]
    fn unparseable_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();
        let err = XlsxFileStore::new(&path).load().unwrap_err();
        let ledger_err: auction_core::LedgerError = err.into();
        assert!(matches!(ledger_err, auction_core::LedgerError::StorageUnavailable(_)));
    }

    #[test]
    fn in_memory_store_starts_missing_then_returns_saved_copy() {
        let store = InMemoryWorkbookStore::new();
        assert!(store.load().is_err());
        store.save(&auction_workbook()).unwrap();
        assert_eq!(store.load().unwrap(), auction_workbook());
    }

    #[test]
    fn used_range_offset_is_padded_back_to_a1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut xlsx = rust_xlsxwriter::Workbook::new();
        let sheet = xlsx.add_worksheet();
        sheet.set_name("TA").unwrap();
        sheet.write_string(2, 1, "Player Name").unwrap();
        sheet.write_string(2, 2, "Nationality").unwrap();
        sheet.write_string(3, 1, "Raj").unwrap();
        sheet.write_number(3, 2, 7.0).unwrap();
        xlsx.save(&path).unwrap();

        let loaded = XlsxFileStore::new(&path).load().unwrap();
        let ta = loaded.sheet("TA").unwrap();
        assert_eq!(
            ta.rows(),
            &[
                vec![],
                vec![],
                vec![CellValue::Empty, "Player Name".into(), "Nationality".into()],
                vec![CellValue::Empty, "Raj".into(), CellValue::Number(7.0)],
            ]
        );
        assert_eq!(ta.cell(3, 1).as_text(), "Raj");
    }
}
