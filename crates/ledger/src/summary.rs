//! Per-team purse and slot aggregates (`teams.json`).
//!
//! The summary is maintained incrementally by sales. It is never re-derived
//! from the workbook except through the explicit reconcile pass.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use auction_core::{LedgerError, LedgerResult, TeamCode};

/// Aggregate counters for one team.
///
/// Fields not modelled here are carried through `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    #[serde(rename = "Purse Remaining")]
    pub purse_remaining: f64,
    #[serde(rename = "Slots Filled")]
    pub slots_filled: i64,
    #[serde(rename = "Indian Slots Remaining")]
    pub indian_slots_remaining: i64,
    #[serde(rename = "Overseas Slots Remaining")]
    pub overseas_slots_remaining: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TeamSummary {
    pub fn new(purse: f64, indian_slots: i64, overseas_slots: i64) -> Self {
        Self {
            purse_remaining: purse,
            slots_filled: 0,
            indian_slots_remaining: indian_slots,
            overseas_slots_remaining: overseas_slots,
            extra: Map::new(),
        }
    }

    /// Reject a sale the team cannot afford or has no slot left for.
    pub fn check_capacity(&self, price: f64, indian: bool) -> LedgerResult<()> {
        if price > self.purse_remaining {
            return Err(LedgerError::validation(format!(
                "sale price {price} exceeds purse remaining {}",
                self.purse_remaining
            )));
        }
        let (slots, kind) = if indian {
            (self.indian_slots_remaining, "Indian")
        } else {
            (self.overseas_slots_remaining, "overseas")
        };
        if slots <= 0 {
            return Err(LedgerError::validation(format!("no {kind} slots remaining")));
        }
        Ok(())
    }

    pub fn record_sale(&mut self, price: f64, indian: bool) {
        self.purse_remaining -= price;
        self.slots_filled += 1;
        if indian {
            self.indian_slots_remaining -= 1;
        } else {
            self.overseas_slots_remaining -= 1;
        }
    }

    pub fn reverse_sale(&mut self, price: f64, indian: bool) {
        self.purse_remaining += price;
        self.slots_filled -= 1;
        if indian {
            self.indian_slots_remaining += 1;
        } else {
            self.overseas_slots_remaining += 1;
        }
    }
}

/// All team summaries, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryBook {
    teams: Vec<(String, TeamSummary)>,
}

impl SummaryBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teams(teams: Vec<(String, TeamSummary)>) -> Self {
        Self { teams }
    }

    pub fn teams(&self) -> &[(String, TeamSummary)] {
        &self.teams
    }

    pub fn get(&self, key: &str) -> Option<&TeamSummary> {
        self.teams.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TeamSummary> {
        self.teams.iter_mut().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    /// First key (file order) carrying the `(CODE)` suffix.
    pub fn resolve(&self, code: &TeamCode) -> Option<&str> {
        self.teams
            .iter()
            .map(|(k, _)| k.as_str())
            .find(|k| code.matches_key(k))
    }

    /// Key whose display name or short code equals a sheet name.
    pub fn key_for_sheet(&self, sheet_name: &str) -> Option<&str> {
        self.teams.iter().map(|(k, _)| k.as_str()).find(|k| {
            TeamCode::split_key(k)
                .is_some_and(|(display, code)| display == sheet_name || code == sheet_name)
        })
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}

impl Serialize for SummaryBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.teams.len()))?;
        for (key, summary) in &self.teams {
            map.serialize_entry(key, summary)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SummaryBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let teams = raw
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value::<TeamSummary>(value)
                    .map(|summary| (key.clone(), summary))
                    .map_err(|e| D::Error::custom(format!("team '{key}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { teams })
    }
}
