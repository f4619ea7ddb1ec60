//! Subscriber setup for the auction service.
//!
//! One JSON line per event on stdout. Request logs carry ledger fields
//! (`player`, `team`, `sheet`, `price`) rather than module targets.

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or does not parse.
pub const DEFAULT_FILTER: &str = "info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the process-wide subscriber. Later calls keep the first one.
pub fn init() {
    // Err only when a global subscriber already exists.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_twice_is_harmless() {
        super::init();
        super::init();
    }

    #[test]
    fn default_filter_parses() {
        let _ = tracing_subscriber::EnvFilter::new(super::DEFAULT_FILTER);
    }
}
