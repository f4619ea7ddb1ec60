//! Ledger mutations applied to an in-memory workbook + summary pair.
//!
//! Nothing here touches storage. A failing mutation may leave the in-memory
//! copies half-changed; callers discard them instead of committing.

use auction_core::{
    LedgerError, LedgerResult, Nationality, POOL_SHEET, SalePrice, TeamCode, is_indian,
    require_text,
};
use auction_workbook::{CellValue, Sheet, Workbook};

use crate::sorter::{NATIONALITY_HEADER, sort_workbook};
use crate::summary::SummaryBook;

pub const PRICE_HEADER: &str = "Sold For";

/// Positional fallbacks for team sheets missing their headers.
const PRICE_COLUMN: usize = 1;
const NATIONALITY_COLUMN: usize = 3;

/// A validated sale of a player to a team.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub player: String,
    pub team: TeamCode,
    pub price: SalePrice,
    pub speciality: String,
    pub nationality: Nationality,
}

impl Sale {
    pub fn new(
        player: Option<&str>,
        team: Option<&str>,
        price: Option<f64>,
        speciality: Option<&str>,
        nationality: Option<&str>,
    ) -> LedgerResult<Self> {
        Ok(Self {
            player: require_text("player_name", player)?,
            team: TeamCode::parse(team.unwrap_or_default())?,
            price: SalePrice::parse("sold_for", price)?,
            speciality: require_text("speciality", speciality)?,
            nationality: Nationality::parse(nationality.unwrap_or_default())?,
        })
    }
}

/// A player going (back) into the pool sheet at an asking price.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolEntry {
    pub player: String,
    pub base_price: SalePrice,
}

impl PoolEntry {
    pub fn new(player: Option<&str>, base_price: Option<f64>) -> LedgerResult<Self> {
        Ok(Self {
            player: require_text("player_name", player)?,
            base_price: SalePrice::parse("base_price", base_price)?,
        })
    }
}

/// Move a player from a team sheet back to the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub sheet: String,
    pub entry: PoolEntry,
    /// Reverse the original sale in the summary as well.
    pub refund: bool,
}

impl Removal {
    pub fn new(
        sheet: Option<&str>,
        player: Option<&str>,
        base_price: Option<f64>,
        refund: bool,
    ) -> LedgerResult<Self> {
        let sheet = match sheet {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => return Err(LedgerError::validation("sheet_name is required")),
        };
        Ok(Self {
            sheet,
            entry: PoolEntry::new(player, base_price)?,
            refund,
        })
    }
}

/// What a successful sale changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleOutcome {
    pub sheet: String,
    pub team_key: String,
    pub removed_from_pool: bool,
}

/// Record a sale: team row appended, pool row dropped, summary debited, sheets sorted.
pub fn sell(
    workbook: &mut Workbook,
    summary: &mut SummaryBook,
    sale: &Sale,
    enforce_capacity: bool,
) -> LedgerResult<SaleOutcome> {
    let team_key = summary.resolve(&sale.team).map(str::to_owned);
    let sheet_name = team_sheet_name(workbook, &sale.team, team_key.as_deref())?;

    let sheet = workbook
        .sheet_mut(&sheet_name)
        .ok_or_else(|| LedgerError::missing_sheet(&sheet_name))?;
    sheet.append(vec![
        CellValue::from(sale.player.as_str()),
        CellValue::Number(sale.price.amount()),
        CellValue::from(sale.speciality.as_str()),
        CellValue::from(sale.nationality.as_str()),
    ]);

    let removed_from_pool = remove_from_pool(workbook, &sale.player);

    let team_key = team_key.ok_or_else(|| LedgerError::missing_team(sale.team.as_str()))?;
    let team = summary
        .get_mut(&team_key)
        .ok_or_else(|| LedgerError::missing_team(sale.team.as_str()))?;
    let indian = sale.nationality.is_indian();
    if enforce_capacity {
        team.check_capacity(sale.price.amount(), indian)?;
    }
    team.record_sale(sale.price.amount(), indian);

    sort_workbook(workbook);

    Ok(SaleOutcome {
        sheet: sheet_name,
        team_key,
        removed_from_pool,
    })
}

/// Append `[name, price]` to the pool sheet.
pub fn return_to_pool(workbook: &mut Workbook, entry: &PoolEntry) -> LedgerResult<()> {
    let pool = workbook
        .sheet_mut(POOL_SHEET)
        .ok_or_else(|| LedgerError::missing_sheet(POOL_SHEET))?;
    pool.append(pool_row(entry));
    sort_workbook(workbook);
    Ok(())
}

/// Remove the first row naming the player from a sheet and return them to the pool.
///
/// Only the first exact (case-sensitive) match is removed; duplicates stay.
pub fn remove_and_return(
    workbook: &mut Workbook,
    summary: &mut SummaryBook,
    removal: &Removal,
) -> LedgerResult<()> {
    if !workbook.contains(&removal.sheet) {
        return Err(LedgerError::missing_sheet(&removal.sheet));
    }
    if !workbook.contains(POOL_SHEET) {
        return Err(LedgerError::missing_sheet(POOL_SHEET));
    }

    let player = removal.entry.player.as_str();
    let sheet = workbook
        .sheet_mut(&removal.sheet)
        .ok_or_else(|| LedgerError::missing_sheet(&removal.sheet))?;
    let index = sheet
        .data_rows()
        .iter()
        .position(|row| row.first().is_some_and(|c| c.as_text() == player))
        .ok_or_else(|| LedgerError::missing_player(&removal.sheet, player))?;

    if removal.refund {
        let (price, indian) = sold_terms(sheet, index)?;
        let key = summary
            .key_for_sheet(&removal.sheet)
            .map(str::to_owned)
            .ok_or_else(|| LedgerError::missing_team(&removal.sheet))?;
        if let Some(team) = summary.get_mut(&key) {
            team.reverse_sale(price, indian);
        }
    }

    sheet.remove_data_row(index);

    if let Some(pool) = workbook.sheet_mut(POOL_SHEET) {
        pool.append(pool_row(&removal.entry));
    }
    sort_workbook(workbook);
    Ok(())
}

/// Team sheet for a sale: a sheet named by the short code, else by the key's display name.
fn team_sheet_name(
    workbook: &Workbook,
    code: &TeamCode,
    team_key: Option<&str>,
) -> LedgerResult<String> {
    if workbook.contains(code.as_str()) {
        return Ok(code.as_str().to_string());
    }
    team_key
        .and_then(TeamCode::split_key)
        .map(|(display, _)| display)
        .filter(|display| workbook.contains(display))
        .map(str::to_owned)
        .ok_or_else(|| LedgerError::missing_sheet(code.as_str()))
}

/// Drop the first pool row whose name matches ignoring case and surrounding space.
fn remove_from_pool(workbook: &mut Workbook, player: &str) -> bool {
    let Some(pool) = workbook.sheet_mut(POOL_SHEET) else {
        return false;
    };
    let wanted = player.trim().to_lowercase();
    let found = pool.data_rows().iter().position(|row| {
        row.first()
            .is_some_and(|c| c.as_text().trim().to_lowercase() == wanted)
    });
    match found {
        Some(index) => pool.remove_data_row(index).is_some(),
        None => false,
    }
}

fn pool_row(entry: &PoolEntry) -> Vec<CellValue> {
    vec![
        CellValue::from(entry.player.as_str()),
        CellValue::Number(entry.base_price.amount()),
    ]
}

/// Sale price and nationality class of a team-sheet data row.
pub(crate) fn sold_terms(sheet: &Sheet, data_index: usize) -> LedgerResult<(f64, bool)> {
    let price_col = sheet.column_index(PRICE_HEADER).unwrap_or(PRICE_COLUMN);
    let nat_col = sheet
        .column_index(NATIONALITY_HEADER)
        .unwrap_or(NATIONALITY_COLUMN);
    let row = data_index + 1;

    let price = sheet.cell(row, price_col).as_number().ok_or_else(|| {
        LedgerError::validation(format!(
            "row {} of '{}' has no numeric sale price",
            row + 1,
            sheet.name()
        ))
    })?;
    Ok((price, is_indian(&sheet.cell(row, nat_col).as_text())))
}
