//! Transfer receipt domain model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outcome of a transfer as reported by the widget.
///
/// This is an opaque pass-through: every field is optional and the struct is
/// used only for display. `amount` is kept as a raw JSON value because the
/// widget reports it as a number or a string depending on the flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub to_address: Option<String>,
    #[serde(default)]
    pub tx_id: Option<String>,
}
