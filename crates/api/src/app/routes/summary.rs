use std::fmt::Write as _;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};

use auction_ledger::SummaryBook;

use crate::app::services::{self, SharedLedger};

pub async fn summary_json(Extension(ledger): Extension<SharedLedger>) -> axum::response::Response {
    match services::run_blocking(ledger, |ledger| ledger.summary()).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn summary_page(Extension(ledger): Extension<SharedLedger>) -> axum::response::Response {
    match services::run_blocking(ledger, |ledger| ledger.summary()).await {
        Ok(summary) => Html(render_summary(&summary)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn reconcile_preview(
    Extension(ledger): Extension<SharedLedger>,
) -> axum::response::Response {
    match services::run_blocking(ledger, |ledger| ledger.reconcile_preview()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn reconcile_apply(Extension(ledger): Extension<SharedLedger>) -> axum::response::Response {
    match services::run_blocking(ledger, |ledger| ledger.reconcile_apply()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(resp) => resp,
    }
}

const PAGE_HEAD: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
<title>Auction Summary</title>\n</head>\n<body>\n<h1>Auction Summary</h1>\n<table>\n\
<tr><th>Team</th><th>Purse Remaining</th><th>Slots Filled</th>\
<th>Indian Slots Remaining</th><th>Overseas Slots Remaining</th></tr>\n";

const PAGE_TAIL: &str = "</table>\n</body>\n</html>\n";

/// One table row per team, in summary file order.
pub fn render_summary(summary: &SummaryBook) -> String {
    let mut html = String::from(PAGE_HEAD);
    for (team, s) in summary.teams() {
        // Writing into a String cannot fail.
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(team),
            s.purse_remaining,
            s.slots_filled,
            s.indian_slots_remaining,
            s.overseas_slots_remaining,
        );
    }
    html.push_str(PAGE_TAIL);
    html
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
