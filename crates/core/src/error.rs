//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger layers.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// What a `NotFound` failure was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// A named sheet is absent from the workbook.
    Sheet(String),
    /// A team short code (or sheet name) did not resolve to a summary key.
    Team(String),
    /// No data row in `sheet` carries the player name.
    Player { sheet: String, player: String },
}

impl core::fmt::Display for Missing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Missing::Sheet(name) => write!(f, "sheet '{name}' not found"),
            Missing::Team(code) => write!(f, "team '{code}' not found in summary"),
            Missing::Player { sheet, player } => {
                write!(f, "player '{player}' not found in {sheet}")
            }
        }
    }
}

/// Ledger-level error.
///
/// Every failure surfaced to callers falls into one of three buckets:
/// bad input, a referenced thing that does not exist, or storage trouble.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A required field was missing, blank, or out of range.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced sheet, team or player is absent.
    #[error("{0}")]
    NotFound(Missing),

    /// The workbook or summary file could not be read or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    pub fn missing_sheet(name: impl Into<String>) -> Self {
        Self::NotFound(Missing::Sheet(name.into()))
    }

    pub fn missing_team(code: impl Into<String>) -> Self {
        Self::NotFound(Missing::Team(code.into()))
    }

    pub fn missing_player(sheet: impl Into<String>, player: impl Into<String>) -> Self {
        Self::NotFound(Missing::Player {
            sheet: sheet.into(),
            player: player.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_name_the_missing_thing() {
        assert_eq!(
            LedgerError::missing_sheet("Unsold").to_string(),
            "sheet 'Unsold' not found"
        );
        assert_eq!(
            LedgerError::missing_player("TA", "Raj").to_string(),
            "player 'Raj' not found in TA"
        );
    }
}
