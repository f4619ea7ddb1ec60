//! Batch recomputation of team summaries from the workbook.
//!
//! Sales update the summary incrementally, so a missed or doubled update
//! drifts it from the sheets for good. This pass re-derives every team's
//! counters from its sheet and reports (or repairs) the difference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use auction_core::{POOL_SHEET, TeamCode, is_indian};
use auction_workbook::{Sheet, Workbook};

use crate::mutator::sold_terms;
use crate::sorter::NATIONALITY_HEADER;
use crate::summary::{SummaryBook, TeamSummary};

/// Starting purse and slot allocation for every team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonRules {
    pub initial_purse: f64,
    pub indian_slots: i64,
    pub overseas_slots: i64,
}

impl Default for SeasonRules {
    fn default() -> Self {
        Self {
            initial_purse: 100.0,
            indian_slots: 17,
            overseas_slots: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamCounters {
    pub purse_remaining: f64,
    pub slots_filled: i64,
    pub indian_slots_remaining: i64,
    pub overseas_slots_remaining: i64,
}

impl TeamCounters {
    fn of(summary: &TeamSummary) -> Self {
        Self {
            purse_remaining: summary.purse_remaining,
            slots_filled: summary.slots_filled,
            indian_slots_remaining: summary.indian_slots_remaining,
            overseas_slots_remaining: summary.overseas_slots_remaining,
        }
    }

    fn differs(&self, other: &Self) -> bool {
        (self.purse_remaining - other.purse_remaining).abs() > 1e-9
            || self.slots_filled != other.slots_filled
            || self.indian_slots_remaining != other.indian_slots_remaining
            || self.overseas_slots_remaining != other.overseas_slots_remaining
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamReconciliation {
    pub team_key: String,
    /// Sheet the counters were derived from; `None` when no sheet matches the key.
    pub sheet: Option<String>,
    pub recorded: TeamCounters,
    pub derived: Option<TeamCounters>,
    pub drifted: bool,
    /// Data rows whose sale price could not be read as a number.
    pub unpriced_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub checked_at: DateTime<Utc>,
    pub teams: Vec<TeamReconciliation>,
    /// Team sheets with no summary key.
    pub unmatched_sheets: Vec<String>,
    pub drifted: usize,
    pub applied: bool,
}

/// Compare every team's recorded counters against what its sheet implies.
pub fn reconcile(workbook: &Workbook, summary: &SummaryBook, rules: &SeasonRules) -> ReconcileReport {
    let mut matched_sheets = Vec::new();
    let teams: Vec<TeamReconciliation> = summary
        .teams()
        .iter()
        .map(|(key, recorded)| {
            let recorded = TeamCounters::of(recorded);
            let Some(sheet) = sheet_for_key(workbook, key) else {
                return TeamReconciliation {
                    team_key: key.clone(),
                    sheet: None,
                    recorded,
                    derived: None,
                    drifted: false,
                    unpriced_rows: 0,
                };
            };
            matched_sheets.push(sheet.name().to_string());
            let (derived, unpriced_rows) = derive(sheet, rules);
            TeamReconciliation {
                team_key: key.clone(),
                sheet: Some(sheet.name().to_string()),
                drifted: recorded.differs(&derived),
                recorded,
                derived: Some(derived),
                unpriced_rows,
            }
        })
        .collect();

    let unmatched_sheets = workbook
        .sheets()
        .iter()
        .map(Sheet::name)
        .filter(|name| *name != POOL_SHEET && !matched_sheets.iter().any(|m| m.as_str() == *name))
        .map(str::to_owned)
        .collect();

    let drifted = teams.iter().filter(|t| t.drifted).count();
    ReconcileReport {
        checked_at: Utc::now(),
        teams,
        unmatched_sheets,
        drifted,
        applied: false,
    }
}

/// Overwrite drifted counters with the derived values. Returns how many teams changed.
pub fn apply(summary: &mut SummaryBook, report: &ReconcileReport) -> usize {
    let mut changed = 0;
    for team in report.teams.iter().filter(|t| t.drifted) {
        let (Some(derived), Some(entry)) = (team.derived, summary.get_mut(&team.team_key)) else {
            continue;
        };
        entry.purse_remaining = derived.purse_remaining;
        entry.slots_filled = derived.slots_filled;
        entry.indian_slots_remaining = derived.indian_slots_remaining;
        entry.overseas_slots_remaining = derived.overseas_slots_remaining;
        changed += 1;
    }
    changed
}

fn sheet_for_key<'a>(workbook: &'a Workbook, key: &str) -> Option<&'a Sheet> {
    let (display, code) = TeamCode::split_key(key)?;
    workbook.sheet(code).or_else(|| workbook.sheet(display))
}

fn derive(sheet: &Sheet, rules: &SeasonRules) -> (TeamCounters, usize) {
    let mut spent = 0.0;
    let mut filled = 0;
    let mut indian = 0;
    let mut unpriced = 0;

    for (index, row) in sheet.data_rows().iter().enumerate() {
        if row.iter().all(|c| c.is_blank()) {
            continue;
        }
        filled += 1;
        match sold_terms(sheet, index) {
            Ok((price, home)) => {
                spent += price;
                if home {
                    indian += 1;
                }
            }
            Err(_) => {
                unpriced += 1;
                let nat = sheet
                    .column_index(NATIONALITY_HEADER)
                    .map(|col| sheet.cell(index + 1, col).as_text().into_owned())
                    .unwrap_or_default();
                if is_indian(&nat) {
                    indian += 1;
                }
            }
        }
    }

    let counters = TeamCounters {
        purse_remaining: rules.initial_purse - spent,
        slots_filled: filled,
        indian_slots_remaining: rules.indian_slots - indian,
        overseas_slots_remaining: rules.overseas_slots - (filled - indian),
    };
    (counters, unpriced)
}
