//! Holdings domain models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One normalized crypto position derived from an upstream portfolio
/// response. All fields are optional; a row exists only if at least one of
/// them was present in the source object.
///
/// `amount` stays a raw JSON value: upstream providers report it as a number
/// or a string depending on the integration, and the renderer prints it
/// either way without reinterpreting precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRow {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub amount: Option<Value>,
}

impl HoldingRow {
    /// A row is kept only when it carries at least one piece of data.
    pub fn is_populated(&self) -> bool {
        self.name.is_some() || self.symbol.is_some() || self.amount.is_some()
    }
}
