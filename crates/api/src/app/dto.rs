use serde::Deserialize;

use auction_core::{LedgerError, LedgerResult};
use auction_ledger::{PoolEntry, Removal, Sale};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /add-player`. Which fields are required depends on `action`.
#[derive(Debug, Default, Deserialize)]
pub struct AddPlayerRequest {
    pub action: Option<String>,
    pub player_name: Option<String>,
    pub team: Option<String>,
    pub sold_for: Option<f64>,
    pub speciality: Option<String>,
    pub nationality: Option<String>,
    pub base_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct FetchTabRequest {
    pub sheet_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemovePlayerRequest {
    pub sheet_name: Option<String>,
    pub player_name: Option<String>,
    pub base_price: Option<f64>,
    #[serde(default)]
    pub refund: bool,
}

// -------------------------
// Mapping helpers
// -------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum AddPlayer {
    Sold(Sale),
    Unsold(PoolEntry),
}

pub const INVALID_ACTION: &str = "Invalid action. Must be 'Sold' or 'Unsold'.";

impl AddPlayerRequest {
    pub fn into_command(self) -> LedgerResult<AddPlayer> {
        let action = self
            .action
            .as_deref()
            .map(|a| a.trim().to_ascii_lowercase())
            .unwrap_or_default();
        match action.as_str() {
            "sold" => Sale::new(
                self.player_name.as_deref(),
                self.team.as_deref(),
                self.sold_for,
                self.speciality.as_deref(),
                self.nationality.as_deref(),
            )
            .map(AddPlayer::Sold),
            "unsold" => {
                PoolEntry::new(self.player_name.as_deref(), self.base_price).map(AddPlayer::Unsold)
            }
            _ => Err(LedgerError::validation(INVALID_ACTION)),
        }
    }
}

impl RemovePlayerRequest {
    pub fn into_removal(self) -> LedgerResult<Removal> {
        Removal::new(
            self.sheet_name.as_deref(),
            self.player_name.as_deref(),
            self.base_price,
            self.refund,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sold_request() -> AddPlayerRequest {
        AddPlayerRequest {
            action: Some(" SOLD ".into()),
            player_name: Some("Raj".into()),
            team: Some(" TA ".into()),
            sold_for: Some(150.0),
            speciality: Some("Bowler".into()),
            nationality: Some("Indian".into()),
            base_price: None,
        }
    }

    #[test]
    fn action_is_case_and_space_insensitive() {
        let cmd = sold_request().into_command().unwrap();
        let AddPlayer::Sold(sale) = cmd else {
            panic!("expected a sale");
        };
        assert_eq!(sale.team.as_str(), "TA");
    }

    #[test]
    fn unknown_action_is_rejected() {
        let req = AddPlayerRequest {
            action: Some("traded".into()),
            ..sold_request()
        };
        let err = req.into_command().unwrap_err();
        assert_eq!(err, LedgerError::validation(INVALID_ACTION));
    }

    #[test]
    fn unsold_needs_a_base_price() {
        let req = AddPlayerRequest {
            action: Some("Unsold".into()),
            ..sold_request()
        };
        assert!(matches!(req.into_command(), Err(LedgerError::Validation(_))));
    }
}
