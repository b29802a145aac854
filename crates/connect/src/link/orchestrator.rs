//! Session-scoped donation workflow orchestrator.
//!
//! Couples the widget lifecycle callbacks to the upstream gateway and the
//! presenter. Each orchestrator owns exactly one donation session: the
//! connected-account payload captured between the connect and transfer
//! callbacks lives here, is replaced by every new connect event, and is
//! cleared when the session returns to the form state.

use std::sync::Arc;

use log::{debug, error, info};

use super::models::{ConnectedPayload, LinkSession, TransferIntent, WidgetCallback};
use super::presenter::ReceiptPresenter;
use super::traits::LinkApiClient;
use givefolio_core::errors::Result;
use givefolio_core::holdings::extract_crypto_rows;
use givefolio_core::receipt::{
    render_holdings, render_holdings_notice, render_transfer, TransferResult,
    HOLDINGS_UNAVAILABLE_MESSAGE, MISSING_ACCESS_TOKEN_MESSAGE,
};
use serde::{Deserialize, Serialize};

/// UI-facing phase of a donation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationPhase {
    /// Showing the donation form; nothing in flight.
    Form,
    /// A link session was minted; waiting for the widget to connect.
    AwaitingWidget,
    /// An account is linked; waiting for the transfer to complete.
    AwaitingTransfer,
    /// The receipt (and holdings panel) is visible.
    ReceiptShown,
}

impl std::fmt::Display for DonationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DonationPhase::Form => write!(f, "form"),
            DonationPhase::AwaitingWidget => write!(f, "awaiting_widget"),
            DonationPhase::AwaitingTransfer => write!(f, "awaiting_transfer"),
            DonationPhase::ReceiptShown => write!(f, "receipt_shown"),
        }
    }
}

/// Orchestrates one donation session.
///
/// The completion path is dual-triggered: the widget may report a finished
/// transfer through its dedicated callback or through a generic
/// `transferExecuted` event. Both funnel into [`finalize_after_transfer`];
/// whichever fires first wins, and a later firing simply re-renders.
///
/// [`finalize_after_transfer`]: DonationOrchestrator::finalize_after_transfer
pub struct DonationOrchestrator<P: ReceiptPresenter> {
    gateway: Arc<dyn LinkApiClient>,
    presenter: Arc<P>,
    connected: Option<ConnectedPayload>,
    phase: DonationPhase,
}

impl<P: ReceiptPresenter> DonationOrchestrator<P> {
    /// Create an orchestrator in the form state.
    pub fn new(gateway: Arc<dyn LinkApiClient>, presenter: Arc<P>) -> Self {
        Self {
            gateway,
            presenter,
            connected: None,
            phase: DonationPhase::Form,
        }
    }

    /// Current UI-facing phase.
    pub fn phase(&self) -> DonationPhase {
        self.phase
    }

    /// Mint a link session for this donation attempt.
    ///
    /// A failure here prevents the widget from opening and propagates to the
    /// caller; it is never swallowed. On success the session advances to
    /// awaiting the widget and the minted session is returned for the
    /// embedding to open the widget with.
    pub async fn open_with_token(&mut self, intent: &TransferIntent) -> Result<LinkSession> {
        let session = self.gateway.create_link_token(intent).await?;
        self.phase = DonationPhase::AwaitingWidget;
        Ok(session)
    }

    /// Dispatch one widget lifecycle callback.
    pub async fn handle_callback(&mut self, callback: WidgetCallback) {
        match callback {
            WidgetCallback::IntegrationConnected(payload) => {
                self.on_integration_connected(payload)
            }
            WidgetCallback::TransferFinished(result) => {
                self.finalize_after_transfer(result).await
            }
            WidgetCallback::Event(event) => match event.into_transfer_result() {
                Some(result) => self.finalize_after_transfer(result).await,
                None => debug!("Ignoring widget event without transfer payload"),
            },
        }
    }

    /// Capture the connected-account payload, replacing any earlier one.
    /// No further side effects; the payload is only read once a transfer
    /// completes.
    fn on_integration_connected(&mut self, payload: ConnectedPayload) {
        info!("Integration connected; capturing account tokens");
        self.connected = Some(payload);
        if self.phase == DonationPhase::AwaitingWidget {
            self.phase = DonationPhase::AwaitingTransfer;
        }
    }

    /// Complete the session after a transfer: show the receipt, then try to
    /// show the recipient's holdings.
    ///
    /// The transfer panel is rendered before any network call and is never
    /// touched afterwards; a missing auth token or a failed holdings fetch
    /// downgrades to an inline notice in the holdings panel. The session
    /// ends in the receipt view regardless.
    pub async fn finalize_after_transfer(&mut self, result: TransferResult) {
        self.presenter.present_transfer(&render_transfer(&result));

        match self.connected.as_ref().and_then(ConnectedPayload::primary_auth_token) {
            None => {
                info!("No access token captured; skipping holdings fetch");
                self.presenter
                    .present_holdings(&render_holdings_notice(MISSING_ACCESS_TOKEN_MESSAGE));
            }
            Some((auth_token, broker_type)) => {
                match self.gateway.fetch_holdings(&auth_token, &broker_type).await {
                    Ok(content) => {
                        let rows = extract_crypto_rows(&content);
                        info!("Fetched holdings: {} crypto positions", rows.len());
                        self.presenter.present_holdings(&render_holdings(&rows));
                    }
                    Err(err) => {
                        error!("Holdings fetch failed: {}", err);
                        self.presenter.present_holdings(&render_holdings_notice(
                            HOLDINGS_UNAVAILABLE_MESSAGE,
                        ));
                    }
                }
            }
        }

        self.phase = DonationPhase::ReceiptShown;
        self.presenter.show_receipt_view();
    }

    /// Return to the form state, clearing the captured payload and the
    /// transient panels.
    pub fn reset(&mut self) {
        self.connected = None;
        self.phase = DonationPhase::Form;
        self.presenter.show_form_view();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use givefolio_core::errors::{Error, GatewayError};
    use givefolio_core::receipt::NO_POSITIONS_MESSAGE;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    use crate::link::models::WidgetEvent;

    /// Gateway stub recording holdings requests and replaying canned
    /// responses.
    struct StubGateway {
        holdings_response: Mutex<Option<Result<Value>>>,
        holdings_calls: Mutex<Vec<(String, String)>>,
        link_token: Option<String>,
    }

    impl StubGateway {
        fn with_holdings(response: Result<Value>) -> Self {
            Self {
                holdings_response: Mutex::new(Some(response)),
                holdings_calls: Mutex::new(Vec::new()),
                link_token: Some("lt-1".to_string()),
            }
        }

        fn without_link_token() -> Self {
            Self {
                holdings_response: Mutex::new(None),
                holdings_calls: Mutex::new(Vec::new()),
                link_token: None,
            }
        }

        fn holdings_calls(&self) -> Vec<(String, String)> {
            self.holdings_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LinkApiClient for StubGateway {
        async fn create_link_token(&self, _intent: &TransferIntent) -> Result<LinkSession> {
            match &self.link_token {
                Some(token) => Ok(LinkSession {
                    link_token: token.clone(),
                    client_id: "client-1".to_string(),
                }),
                None => Err(GatewayError::MissingLinkToken {
                    raw: json!({ "content": {} }),
                }
                .into()),
            }
        }

        async fn fetch_holdings(&self, auth_token: &str, broker_type: &str) -> Result<Value> {
            self.holdings_calls
                .lock()
                .unwrap()
                .push((auth_token.to_string(), broker_type.to_string()));
            self.holdings_response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(json!({})))
        }

        async fn fetch_aggregated_portfolio(&self, _user_id: &str) -> Result<Value> {
            Ok(json!({}))
        }
    }

    /// Presenter recording the last fragment per panel plus the view state.
    #[derive(Default)]
    struct RecordingPresenter {
        transfer: Mutex<Vec<String>>,
        holdings: Mutex<Vec<String>>,
        receipt_visible: Mutex<bool>,
    }

    impl ReceiptPresenter for RecordingPresenter {
        fn present_transfer(&self, fragment: &str) {
            self.transfer.lock().unwrap().push(fragment.to_string());
        }

        fn present_holdings(&self, fragment: &str) {
            self.holdings.lock().unwrap().push(fragment.to_string());
        }

        fn show_receipt_view(&self) {
            *self.receipt_visible.lock().unwrap() = true;
        }

        fn show_form_view(&self) {
            *self.receipt_visible.lock().unwrap() = false;
        }
    }

    fn connected_payload(token: &str, broker_type: &str) -> ConnectedPayload {
        serde_json::from_value(json!({
            "accessToken": {
                "accountTokens": [ { "accessToken": token } ],
                "brokerType": broker_type
            }
        }))
        .unwrap()
    }

    fn transfer_result() -> TransferResult {
        TransferResult {
            status: Some("succeeded".to_string()),
            amount: Some(json!(50)),
            symbol: Some("USDC".to_string()),
            ..Default::default()
        }
    }

    fn intent() -> TransferIntent {
        TransferIntent {
            user_id: "donor-1".to_string(),
            amount_fiat: dec!(50),
            symbol: "USDC".to_string(),
            to_address: "0xABC".to_string(),
            network_id: "net-1".to_string(),
            transaction_id: "tx-1".to_string(),
        }
    }

    #[tokio::test]
    async fn open_with_token_advances_to_awaiting_widget() {
        let gateway = Arc::new(StubGateway::with_holdings(Ok(json!({}))));
        let presenter = Arc::new(RecordingPresenter::default());
        let mut orchestrator = DonationOrchestrator::new(gateway, presenter);

        let session = orchestrator.open_with_token(&intent()).await.unwrap();
        assert_eq!(session.link_token, "lt-1");
        assert_eq!(orchestrator.phase(), DonationPhase::AwaitingWidget);
    }

    #[tokio::test]
    async fn open_with_token_failure_propagates_and_stays_on_form() {
        let gateway = Arc::new(StubGateway::without_link_token());
        let presenter = Arc::new(RecordingPresenter::default());
        let mut orchestrator = DonationOrchestrator::new(gateway, presenter);

        let err = orchestrator.open_with_token(&intent()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Gateway(GatewayError::MissingLinkToken { .. })
        ));
        assert_eq!(orchestrator.phase(), DonationPhase::Form);
    }

    #[tokio::test]
    async fn finalize_uses_the_captured_token_for_the_holdings_fetch() {
        let gateway = Arc::new(StubGateway::with_holdings(Ok(json!({
            "cryptocurrencyPositions": [ { "symbol": "BTC", "amount": 1 } ]
        }))));
        let presenter = Arc::new(RecordingPresenter::default());
        let mut orchestrator = DonationOrchestrator::new(gateway.clone(), presenter.clone());

        orchestrator.open_with_token(&intent()).await.unwrap();
        orchestrator
            .handle_callback(WidgetCallback::IntegrationConnected(connected_payload(
                "tok123", "coinbase",
            )))
            .await;
        assert_eq!(orchestrator.phase(), DonationPhase::AwaitingTransfer);

        orchestrator
            .handle_callback(WidgetCallback::TransferFinished(transfer_result()))
            .await;

        assert_eq!(
            gateway.holdings_calls(),
            vec![("tok123".to_string(), "coinbase".to_string())]
        );
        assert_eq!(orchestrator.phase(), DonationPhase::ReceiptShown);
        assert!(*presenter.receipt_visible.lock().unwrap());
        let holdings = presenter.holdings.lock().unwrap();
        assert!(holdings.last().unwrap().contains("BTC"));
    }

    #[tokio::test]
    async fn transfer_without_connect_renders_the_missing_token_notice() {
        let gateway = Arc::new(StubGateway::with_holdings(Ok(json!({}))));
        let presenter = Arc::new(RecordingPresenter::default());
        let mut orchestrator = DonationOrchestrator::new(gateway.clone(), presenter.clone());

        orchestrator.finalize_after_transfer(transfer_result()).await;

        // No fetch was attempted, the notice is up, and the receipt shows.
        assert!(gateway.holdings_calls().is_empty());
        let holdings = presenter.holdings.lock().unwrap();
        assert!(holdings.last().unwrap().contains("Missing access token."));
        assert_eq!(presenter.transfer.lock().unwrap().len(), 1);
        assert_eq!(orchestrator.phase(), DonationPhase::ReceiptShown);
    }

    #[tokio::test]
    async fn holdings_failure_keeps_the_transfer_panel_intact() {
        let gateway = Arc::new(StubGateway::with_holdings(Err(Error::Gateway(
            GatewayError::Transport("connection refused".to_string()),
        ))));
        let presenter = Arc::new(RecordingPresenter::default());
        let mut orchestrator = DonationOrchestrator::new(gateway, presenter.clone());

        orchestrator
            .handle_callback(WidgetCallback::IntegrationConnected(connected_payload(
                "tok123", "coinbase",
            )))
            .await;
        orchestrator.finalize_after_transfer(transfer_result()).await;

        let transfer = presenter.transfer.lock().unwrap();
        assert!(transfer.last().unwrap().contains("succeeded"));
        let holdings = presenter.holdings.lock().unwrap();
        assert!(holdings.last().unwrap().contains("Failed to load holdings."));
        assert!(*presenter.receipt_visible.lock().unwrap());
    }

    #[tokio::test]
    async fn generic_transfer_event_behaves_like_the_direct_callback() {
        let gateway = Arc::new(StubGateway::with_holdings(Ok(json!({}))));
        let presenter = Arc::new(RecordingPresenter::default());
        let mut orchestrator = DonationOrchestrator::new(gateway.clone(), presenter.clone());

        orchestrator
            .handle_callback(WidgetCallback::IntegrationConnected(connected_payload(
                "tok123", "robinhood",
            )))
            .await;
        orchestrator
            .handle_callback(WidgetCallback::Event(WidgetEvent {
                kind: "transferExecuted".to_string(),
                payload: Some(json!({ "status": "succeeded", "symbol": "ETH" })),
            }))
            .await;

        assert_eq!(
            gateway.holdings_calls(),
            vec![("tok123".to_string(), "robinhood".to_string())]
        );
        // Empty upstream content extracts to no rows.
        let holdings = presenter.holdings.lock().unwrap();
        assert!(holdings.last().unwrap().contains(NO_POSITIONS_MESSAGE));
    }

    #[tokio::test]
    async fn unrelated_widget_events_are_ignored() {
        let gateway = Arc::new(StubGateway::with_holdings(Ok(json!({}))));
        let presenter = Arc::new(RecordingPresenter::default());
        let mut orchestrator = DonationOrchestrator::new(gateway, presenter.clone());

        orchestrator
            .handle_callback(WidgetCallback::Event(WidgetEvent {
                kind: "pageLoaded".to_string(),
                payload: Some(json!({})),
            }))
            .await;

        assert!(presenter.transfer.lock().unwrap().is_empty());
        assert_eq!(orchestrator.phase(), DonationPhase::Form);
    }

    #[tokio::test]
    async fn a_second_completion_signal_re_renders() {
        let gateway = Arc::new(StubGateway::with_holdings(Ok(json!({}))));
        let presenter = Arc::new(RecordingPresenter::default());
        let mut orchestrator = DonationOrchestrator::new(gateway, presenter.clone());

        orchestrator.finalize_after_transfer(transfer_result()).await;
        let updated = TransferResult {
            status: Some("completed".to_string()),
            ..transfer_result()
        };
        orchestrator.finalize_after_transfer(updated).await;

        let transfer = presenter.transfer.lock().unwrap();
        assert_eq!(transfer.len(), 2);
        assert!(transfer.last().unwrap().contains("completed"));
    }

    #[tokio::test]
    async fn reset_clears_the_captured_payload() {
        let gateway = Arc::new(StubGateway::with_holdings(Ok(json!({}))));
        let presenter = Arc::new(RecordingPresenter::default());
        let mut orchestrator = DonationOrchestrator::new(gateway.clone(), presenter.clone());

        orchestrator
            .handle_callback(WidgetCallback::IntegrationConnected(connected_payload(
                "tok123", "coinbase",
            )))
            .await;
        orchestrator.reset();
        assert_eq!(orchestrator.phase(), DonationPhase::Form);
        assert!(!*presenter.receipt_visible.lock().unwrap());

        // The cleared payload means a later transfer has no token to use.
        orchestrator.finalize_after_transfer(transfer_result()).await;
        assert!(gateway.holdings_calls().is_empty());
    }
}
