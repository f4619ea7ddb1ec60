//! Sheet → JSON row objects for display.

use std::collections::HashSet;

use serde_json::{Map, Number, Value};

use auction_workbook::{CellValue, Sheet};

pub type RowObject = Map<String, Value>;

/// Project a sheet's data rows into JSON objects keyed by header name.
///
/// Columns empty in every data row and rows empty in every column are dropped.
/// Header names are trimmed; blank headers become `Unnamed: <index>` and
/// repeated names get `.1`, `.2`, ... suffixes. Empty cells become `""`.
pub fn project(sheet: &Sheet) -> Vec<RowObject> {
    let data = sheet.data_rows();
    let width = data
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(sheet.header().len()))
        .max()
        .unwrap_or(0);

    let names = header_names(sheet, width);
    let kept: Vec<usize> = (0..width)
        .filter(|&col| data.iter().any(|row| !cell_at(row, col).is_blank()))
        .collect();

    data.iter()
        .filter(|row| kept.iter().any(|&col| !cell_at(row, col).is_blank()))
        .map(|row| {
            kept.iter()
                .map(|&col| (names[col].clone(), to_json(cell_at(row, col))))
                .collect()
        })
        .collect()
}

fn cell_at(row: &[CellValue], col: usize) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    row.get(col).unwrap_or(&EMPTY)
}

fn header_names(sheet: &Sheet, width: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    (0..width)
        .map(|col| {
            let raw = sheet.cell(0, col).as_text().trim().to_string();
            let base = if raw.is_empty() {
                format!("Unnamed: {col}")
            } else {
                raw
            };
            let mut name = base.clone();
            let mut n = 0;
            while !seen.insert(name.clone()) {
                n += 1;
                name = format!("{base}.{n}");
            }
            name
        })
        .collect()
}

fn to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::String(String::new()),
        CellValue::Text(s) => Value::String(s.clone()),
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
            Value::Number(Number::from(*n as i64))
        }
        CellValue::Number(n) => Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(String::new())),
    }
}
