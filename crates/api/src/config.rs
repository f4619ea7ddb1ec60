//! Environment-driven configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow};

use auction_ledger::{LedgerConfig, SeasonRules};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const WORKBOOK_FILE: &str = "Auction_Sheet.xlsx";
pub const TEAMS_FILE: &str = "teams.json";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub workbook_path: PathBuf,
    pub teams_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub ledger: LedgerConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let data_dir = PathBuf::from(
            lookup("AUCTION_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );
        let workbook_path = lookup("AUCTION_WORKBOOK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(WORKBOOK_FILE));
        let teams_path = lookup("AUCTION_TEAMS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(TEAMS_FILE));

        let bind_addr: SocketAddr = match parse_var(&lookup, "AUCTION_BIND_ADDR")? {
            Some(addr) => addr,
            None => DEFAULT_BIND_ADDR
                .parse()
                .context("invalid default bind address")?,
        };

        let defaults = SeasonRules::default();
        let season = SeasonRules {
            initial_purse: parse_var(&lookup, "AUCTION_INITIAL_PURSE")?
                .unwrap_or(defaults.initial_purse),
            indian_slots: parse_var(&lookup, "AUCTION_INDIAN_SLOTS")?
                .unwrap_or(defaults.indian_slots),
            overseas_slots: parse_var(&lookup, "AUCTION_OVERSEAS_SLOTS")?
                .unwrap_or(defaults.overseas_slots),
        };
        let enforce_capacity = parse_var(&lookup, "AUCTION_ENFORCE_CAPACITY")?.unwrap_or(true);

        Ok(Self {
            workbook_path,
            teams_path,
            bind_addr,
            ledger: LedgerConfig {
                season,
                enforce_capacity,
            },
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("{key}={raw:?} is invalid: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_into_the_data_dir() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.workbook_path, PathBuf::from("data/Auction_Sheet.xlsx"));
        assert_eq!(config.teams_path, PathBuf::from("data/teams.json"));
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.ledger, LedgerConfig::default());
    }

    #[test]
    fn explicit_paths_and_rules_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AUCTION_DATA_DIR", "/srv/auction"),
            ("AUCTION_TEAMS_PATH", "/etc/teams.json"),
            ("AUCTION_BIND_ADDR", "127.0.0.1:9000"),
            ("AUCTION_INITIAL_PURSE", "120.5"),
            ("AUCTION_OVERSEAS_SLOTS", "6"),
            ("AUCTION_ENFORCE_CAPACITY", "false"),
        ]))
        .unwrap();
        assert_eq!(config.workbook_path, PathBuf::from("/srv/auction/Auction_Sheet.xlsx"));
        assert_eq!(config.teams_path, PathBuf::from("/etc/teams.json"));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.ledger.season.initial_purse, 120.5);
        assert_eq!(config.ledger.season.overseas_slots, 6);
        assert!(!config.ledger.enforce_capacity);
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[("AUCTION_INDIAN_SLOTS", "many")])).unwrap_err();
        assert!(err.to_string().contains("AUCTION_INDIAN_SLOTS"));
    }
}
