use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::{CellValue, Row, Sheet, StoreError, Workbook};

/// Load every sheet of an xlsx file as plain values.
pub fn load_xlsx(path: &Path) -> Result<Workbook, StoreError> {
    if !path.exists() {
        return Err(StoreError::Missing(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(StoreError::InvalidFormat(
            "workbook contains no sheets".to_string(),
        ));
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in &sheet_names {
        let range = workbook.worksheet_range(sheet_name)?;

        // The used range may not start at A1; pad back to the sheet origin.
        let (first_row, first_col) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Row> = vec![Vec::new(); first_row as usize];

        for cells in range.rows() {
            let mut row: Row = vec![CellValue::Empty; first_col as usize];
            row.extend(cells.iter().map(to_cell_value));
            while row.last().is_some_and(CellValue::is_blank) {
                row.pop();
            }
            rows.push(row);
        }

        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }

        sheets.push(Sheet::with_rows(sheet_name.clone(), rows));
    }

    tracing::debug!(path = %path.display(), sheets = sheets.len(), "workbook loaded");
    Ok(Workbook::with_sheets(sheets))
}

fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Text(format!("{e:?}")),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
