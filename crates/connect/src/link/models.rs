//! Models for the link workflow: widget payloads and upstream session data.
//! The widget payload shapes mirror what the embedded SDK actually delivers;
//! everything optional stays optional.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use givefolio_core::receipt::TransferResult;

/// Broker type assumed when the connected payload does not carry one.
pub const DEFAULT_BROKER_TYPE: &str = "coinbase";

/// Event kind on the generic widget event stream that signals a completed
/// transfer.
pub const TRANSFER_EXECUTED_EVENT: &str = "transferExecuted";

/// Upstream network identifier for a chain name. The mapping is fixed:
/// identifiers are assigned by the integration API, not derived.
pub fn network_id_for_chain(chain: &str) -> Option<&'static str> {
    match chain {
        "ethereum" => Some("e3c7fdd8-b1fc-4e51-85ae-bb276e075611"),
        _ => None,
    }
}

/// One widget session authorization minted by the upstream API.
/// Consumed once by the widget; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSession {
    pub link_token: String,
    pub client_id: String,
}

/// Resolved parameters of one donation attempt.
#[derive(Debug, Clone)]
pub struct TransferIntent {
    pub user_id: String,
    pub amount_fiat: Decimal,
    pub symbol: String,
    pub to_address: String,
    pub network_id: String,
    pub transaction_id: String,
}

/// Payload delivered by the widget when the user finishes linking an
/// account. Only the first account token and the broker type tag are read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPayload {
    #[serde(default)]
    pub access_token: Option<AccessTokenPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenPayload {
    #[serde(default)]
    pub account_tokens: Vec<AccountToken>,
    #[serde(default)]
    pub broker_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountToken {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl ConnectedPayload {
    /// Auth token of the first linked account plus the broker type,
    /// defaulting to [`DEFAULT_BROKER_TYPE`] when the payload has no tag.
    pub fn primary_auth_token(&self) -> Option<(String, String)> {
        let access = self.access_token.as_ref()?;
        let token = access.account_tokens.first()?.access_token.clone()?;
        let broker_type = access
            .broker_type
            .clone()
            .unwrap_or_else(|| DEFAULT_BROKER_TYPE.to_string());
        Some((token, broker_type))
    }
}

/// An entry from the widget's generic event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

impl WidgetEvent {
    /// Transfer result carried by a `transferExecuted` event, if any.
    pub fn into_transfer_result(self) -> Option<TransferResult> {
        if self.kind != TRANSFER_EXECUTED_EVENT {
            return None;
        }
        serde_json::from_value(self.payload?).ok()
    }
}

/// A widget lifecycle callback at the system boundary.
///
/// The widget signals transfer completion through either a dedicated
/// callback or its generic event stream; both arrive here as distinct
/// variants and are collapsed into one internal completion path by the
/// orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "callback", content = "payload", rename_all = "camelCase")]
pub enum WidgetCallback {
    IntegrationConnected(ConnectedPayload),
    TransferFinished(TransferResult),
    Event(WidgetEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connected_payload_exposes_the_first_account_token() {
        let payload: ConnectedPayload = serde_json::from_value(json!({
            "accessToken": {
                "accountTokens": [
                    { "accessToken": "tok123", "account": { "accountName": "Main" } },
                    { "accessToken": "tok456" },
                ],
                "brokerType": "coinbase"
            }
        }))
        .unwrap();

        assert_eq!(
            payload.primary_auth_token(),
            Some(("tok123".to_string(), "coinbase".to_string()))
        );
    }

    #[test]
    fn missing_broker_type_defaults_to_coinbase() {
        let payload: ConnectedPayload = serde_json::from_value(json!({
            "accessToken": { "accountTokens": [ { "accessToken": "tok123" } ] }
        }))
        .unwrap();

        assert_eq!(
            payload.primary_auth_token(),
            Some(("tok123".to_string(), DEFAULT_BROKER_TYPE.to_string()))
        );
    }

    #[test]
    fn payload_without_tokens_has_no_auth_token() {
        assert_eq!(ConnectedPayload::default().primary_auth_token(), None);

        let empty_tokens: ConnectedPayload = serde_json::from_value(json!({
            "accessToken": { "accountTokens": [], "brokerType": "coinbase" }
        }))
        .unwrap();
        assert_eq!(empty_tokens.primary_auth_token(), None);
    }

    #[test]
    fn transfer_executed_event_carries_a_transfer_result() {
        let event: WidgetEvent = serde_json::from_value(json!({
            "type": "transferExecuted",
            "payload": { "status": "succeeded", "amount": 50, "symbol": "USDC" }
        }))
        .unwrap();

        let result = event.into_transfer_result().unwrap();
        assert_eq!(result.status.as_deref(), Some("succeeded"));
        assert_eq!(result.amount, Some(json!(50)));
    }

    #[test]
    fn other_event_kinds_are_ignored() {
        let event = WidgetEvent {
            kind: "integrationSelected".to_string(),
            payload: Some(json!({ "status": "done" })),
        };
        assert!(event.into_transfer_result().is_none());

        let no_payload = WidgetEvent {
            kind: TRANSFER_EXECUTED_EVENT.to_string(),
            payload: None,
        };
        assert!(no_payload.into_transfer_result().is_none());
    }

    #[test]
    fn widget_callbacks_parse_from_their_tagged_form() {
        let callback: WidgetCallback = serde_json::from_value(json!({
            "callback": "transferFinished",
            "payload": { "status": "pending", "txId": "0xabc" }
        }))
        .unwrap();

        match callback {
            WidgetCallback::TransferFinished(result) => {
                assert_eq!(result.tx_id.as_deref(), Some("0xabc"));
            }
            other => panic!("unexpected callback: {:?}", other),
        }
    }

    #[test]
    fn network_mapping_knows_ethereum_only() {
        assert!(network_id_for_chain("ethereum").is_some());
        assert!(network_id_for_chain("dogecoin").is_none());
    }
}
