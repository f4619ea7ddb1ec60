//! Tabular store adapter: an in-memory workbook model plus xlsx persistence.
//!
//! The model is deliberately plain: named sheets holding rows of scalar
//! values. Formatting, formulas and column widths are not carried.

mod error;
pub mod model;
pub mod staging;
pub mod store;
mod xlsx_reader;
mod xlsx_writer;

pub use error::StoreError;
pub use model::{CellValue, Row, Sheet, Workbook};
pub use staging::StagedFile;
pub use store::{InMemoryWorkbookStore, WorkbookStore, XlsxFileStore};
pub use xlsx_reader::load_xlsx;
pub use xlsx_writer::{save_xlsx, stage_xlsx, xlsx_bytes};
