//! Value objects: small validated wrappers compared by value.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Name of the pool sheet holding players not yet bought by any team.
pub const POOL_SHEET: &str = "Unsold";

/// Require a present, non-blank text field.
///
/// Returns the value trimmed of surrounding whitespace.
pub fn require_text(field: &str, value: Option<&str>) -> LedgerResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(LedgerError::validation(format!("{field} is required"))),
    }
}

/// Short team abbreviation used by clients (e.g. `TA`).
///
/// Summary keys carry the code as a parenthesized suffix: `"Team Alpha (TA)"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamCode(String);

impl TeamCode {
    pub fn parse(raw: &str) -> LedgerResult<Self> {
        let code = require_text("team", Some(raw))?;
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `key` ends with `"(CODE)"`.
    pub fn matches_key(&self, key: &str) -> bool {
        key.strip_suffix(')')
            .and_then(|rest| rest.strip_suffix(self.0.as_str()))
            .is_some_and(|rest| rest.ends_with('('))
    }

    /// Split a summary key into its display name and short code.
    ///
    /// `"Team Alpha (TA)"` → `("Team Alpha", "TA")`. Keys without a
    /// parenthesized suffix yield `None`.
    pub fn split_key(key: &str) -> Option<(&str, &str)> {
        let body = key.strip_suffix(')')?;
        let open = body.rfind('(')?;
        Some((body[..open].trim_end(), &body[open + 1..]))
    }
}

impl core::fmt::Display for TeamCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Player nationality as written on a team sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nationality(String);

impl Nationality {
    pub fn parse(raw: &str) -> LedgerResult<Self> {
        let value = require_text("nationality", Some(raw))?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Indian players consume the domestic slot allocation; everyone else is overseas.
    pub fn is_indian(&self) -> bool {
        is_indian(&self.0)
    }
}

/// Case-insensitive check used for slot accounting.
pub fn is_indian(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("indian")
}

/// A sale or asking price.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalePrice(f64);

impl SalePrice {
    pub fn parse(field: &str, value: Option<f64>) -> LedgerResult<Self> {
        let Some(amount) = value else {
            return Err(LedgerError::validation(format!("{field} is required")));
        };
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::validation(format!(
                "{field} must be a non-negative number"
            )));
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}
