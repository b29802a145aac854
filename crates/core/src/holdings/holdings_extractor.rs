//! Extraction of crypto positions from heterogeneous portfolio responses.
//!
//! The upstream aggregation API has no stable holdings schema: position data
//! may arrive as a dedicated top-level list, as a generic positions list with
//! an asset-type tag, or nested per account, and every logical field goes by
//! several names depending on the integration behind the account. The
//! extractor is deliberately permissive: each lookup is an ordered table of
//! field-name candidates, and a position appearing in two locations yields
//! two rows.

use serde_json::Value;

use super::holdings_model::HoldingRow;

/// Field-name candidates for the display name, in priority order.
const NAME_FIELDS: [&str; 5] = ["name", "tokenName", "assetName", "symbol", "tokenSymbol"];

/// Field-name candidates for the ticker symbol, in priority order.
const SYMBOL_FIELDS: [&str; 3] = ["symbol", "tokenSymbol", "ticker"];

/// Field-name candidates for the position size, in priority order.
const AMOUNT_FIELDS: [&str; 4] = ["amount", "quantity", "balance", "units"];

/// Keys under which an account object may carry its position list.
const ACCOUNT_POSITION_KEYS: [&str; 3] = ["cryptocurrencyPositions", "positions", "holdings"];

/// Normalize an upstream portfolio response into holding rows.
///
/// Three candidate locations are examined in order and their rows
/// concatenated, preserving source-list order:
/// 1. a top-level `cryptocurrencyPositions` list (every element qualifies);
/// 2. a top-level `positions` list, keeping only elements whose
///    `assetType`/`type` contains "crypto" (case-insensitive);
/// 3. a top-level `accounts` list, taking each account's first present
///    position list.
///
/// No deduplication happens across locations. Elements that carry none of
/// name/symbol/amount are dropped. A numeric zero amount is data, not
/// absence, and is retained.
pub fn extract_crypto_rows(response: &Value) -> Vec<HoldingRow> {
    let mut rows = Vec::new();

    if let Some(positions) = response.get("cryptocurrencyPositions").and_then(Value::as_array) {
        for position in positions {
            push_candidate(&mut rows, position);
        }
    }

    if let Some(positions) = response.get("positions").and_then(Value::as_array) {
        for position in positions.iter().filter(|p| is_crypto_position(p)) {
            push_candidate(&mut rows, position);
        }
    }

    if let Some(accounts) = response.get("accounts").and_then(Value::as_array) {
        for account in accounts {
            if let Some(positions) = account_positions(account) {
                for position in positions {
                    push_candidate(&mut rows, position);
                }
            }
        }
    }

    rows
}

/// Append a row for `position` if it carries any usable field.
fn push_candidate(rows: &mut Vec<HoldingRow>, position: &Value) {
    let row = HoldingRow {
        name: first_defined(position, &NAME_FIELDS).map(text_of),
        symbol: first_defined(position, &SYMBOL_FIELDS).map(text_of),
        amount: first_defined(position, &AMOUNT_FIELDS).cloned(),
    };
    if row.is_populated() {
        rows.push(row);
    }
}

/// First field of `candidates` that is present and not JSON null.
fn first_defined<'a>(object: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|key| object.get(key))
        .find(|value| !value.is_null())
}

/// Textual form of a field value: strings pass through, anything else keeps
/// its JSON rendering.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a generic position is tagged as a crypto asset.
fn is_crypto_position(position: &Value) -> bool {
    first_defined(position, &["assetType", "type"])
        .map(|tag| text_of(tag).to_lowercase().contains("crypto"))
        .unwrap_or(false)
}

/// An account's position list: the first of the known keys that is present
/// and non-null, even when that list is empty.
fn account_positions(account: &Value) -> Option<&Vec<Value>> {
    first_defined(account, &ACCOUNT_POSITION_KEYS).and_then(Value::as_array)
}
