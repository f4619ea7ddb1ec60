//! Nationality ordering for team sheets.

use auction_core::POOL_SHEET;
use auction_workbook::{Row, Sheet, Workbook};

pub const NATIONALITY_HEADER: &str = "Nationality";

const HOME_NATIONALITY: &str = "Indian";

/// Sort every team sheet; the pool sheet keeps its insertion order.
pub fn sort_workbook(workbook: &mut Workbook) {
    for sheet in workbook.sheets_mut() {
        if sheet.name() == POOL_SHEET {
            continue;
        }
        sort_sheet(sheet);
    }
}

/// Stable sort of the data rows: `"Indian"` rows first, then by nationality text.
///
/// Sheets with no header-plus-data or no `Nationality` column are left alone.
pub fn sort_sheet(sheet: &mut Sheet) {
    if sheet.total_rows() <= 1 {
        return;
    }
    let Some(nat_index) = sheet.column_index(NATIONALITY_HEADER) else {
        return;
    };

    let mut data = sheet.take_data_rows();
    data.sort_by_cached_key(|row| sort_key(row, nat_index));
    sheet.replace_data_rows(data);
}

fn sort_key(row: &Row, nat_index: usize) -> (bool, String) {
    let nationality = row
        .get(nat_index)
        .map(|c| c.as_text().into_owned())
        .unwrap_or_default();
    (nationality != HOME_NATIONALITY, nationality)
}
