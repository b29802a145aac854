//! Rendering of transfer receipts and holdings into display fragments.
//!
//! Pure functions: the same input always produces the same fragment. Every
//! field value passes through `escape_html` before embedding - the transfer
//! result and the holdings both originate outside this system. Missing
//! values render as empty strings, never as a "null" literal.

use serde_json::Value;

use super::receipt_model::TransferResult;
use crate::holdings::HoldingRow;

/// Shown instead of the holdings table when the list is empty.
pub const NO_POSITIONS_MESSAGE: &str = "No crypto positions.";

/// Soft notice when the connected payload carried no usable access token.
pub const MISSING_ACCESS_TOKEN_MESSAGE: &str = "Missing access token.";

/// Soft notice when the holdings fetch failed after a successful transfer.
pub const HOLDINGS_UNAVAILABLE_MESSAGE: &str = "Failed to load holdings.";

const TRANSFER_HEADING: &str = "Transfer Results";
const PORTFOLIO_HEADING: &str = "Receiver's Portfolio";

/// Escape a string for safe embedding in an HTML fragment.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render a transfer result into the receipt panel fragment.
pub fn render_transfer(result: &TransferResult) -> String {
    format!(
        "<h3>{TRANSFER_HEADING}</h3>\
         <p><strong>Status:</strong> {}</p>\
         <p><strong>Amount:</strong> ${}</p>\
         <p><strong>Symbol:</strong> {}</p>\
         <p><strong>Network ID:</strong> <small>{}</small></p>\
         <p><strong>To Address:</strong> <small>{}</small></p>\
         <p><strong>Transaction ID:</strong> <small>{}</small></p>",
        text_field(&result.status),
        value_field(&result.amount),
        text_field(&result.symbol),
        text_field(&result.network_id),
        text_field(&result.to_address),
        text_field(&result.tx_id),
    )
}

/// Render holdings rows into the portfolio panel fragment.
///
/// An empty list produces an explicit message rather than an empty table.
pub fn render_holdings(rows: &[HoldingRow]) -> String {
    if rows.is_empty() {
        return render_holdings_notice(NO_POSITIONS_MESSAGE);
    }

    let mut body = String::new();
    for row in rows {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            text_field(&row.name),
            text_field(&row.symbol),
            value_field(&row.amount),
        ));
    }

    format!(
        "<h3>{PORTFOLIO_HEADING}</h3>\
         <table>\
         <thead><tr><th>Name</th><th>Symbol</th><th>Amount</th></tr></thead>\
         <tbody>{body}</tbody>\
         </table>"
    )
}

/// Render an informational message into the portfolio panel fragment.
pub fn render_holdings_notice(message: &str) -> String {
    format!(
        "<h3>{PORTFOLIO_HEADING}</h3><p>{}</p>",
        escape_html(message)
    )
}

fn text_field(value: &Option<String>) -> String {
    value.as_deref().map(escape_html).unwrap_or_default()
}

/// Display form of a raw JSON field: strings as-is, numbers in their JSON
/// rendering, anything else JSON-encoded; always escaped.
fn value_field(value: &Option<Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => escape_html(s),
        Some(other) => escape_html(&other.to_string()),
    }
}
