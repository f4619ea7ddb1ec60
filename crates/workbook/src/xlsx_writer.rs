use std::path::Path;

use rust_xlsxwriter::Workbook as XlsxWorkbook;

use crate::{CellValue, StagedFile, StoreError, Workbook};

/// Maximum column index an xlsx worksheet accepts.
const MAX_COL: usize = 16_383;

/// Serialize the workbook to xlsx bytes.
pub fn xlsx_bytes(workbook: &Workbook) -> Result<Vec<u8>, StoreError> {
    if workbook.sheets().is_empty() {
        return Err(StoreError::InvalidFormat(
            "cannot save a workbook with no sheets".to_string(),
        ));
    }

    let mut xlsx = XlsxWorkbook::new();

    for sheet in workbook.sheets() {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(sheet.name())?;

        for (row_idx, row) in sheet.rows().iter().enumerate() {
            let r = u32::try_from(row_idx)
                .map_err(|_| StoreError::InvalidFormat(format!("too many rows in '{}'", sheet.name())))?;
            for (col_idx, cell) in row.iter().enumerate() {
                if col_idx > MAX_COL {
                    return Err(StoreError::InvalidFormat(format!(
                        "too many columns in '{}'",
                        sheet.name()
                    )));
                }
                let c = col_idx as u16;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Number(n) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                    CellValue::Text(s) => {
                        worksheet.write_string(r, c, s)?;
                    }
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(r, c, *b)?;
                    }
                }
            }
        }
    }

    Ok(xlsx.save_to_buffer()?)
}

/// Write the workbook to a temporary sibling of `path` without replacing it yet.
pub fn stage_xlsx(workbook: &Workbook, path: &Path) -> Result<StagedFile, StoreError> {
    let bytes = xlsx_bytes(workbook)?;
    StagedFile::write(path, &bytes)
}

/// Save the workbook, replacing `path` only once the new file is fully written.
pub fn save_xlsx(workbook: &Workbook, path: &Path) -> Result<(), StoreError> {
    stage_xlsx(workbook, path)?.commit()?;
    tracing::debug!(path = %path.display(), "workbook saved");
    Ok(())
}
