//! Donation endpoints: form defaults, link-token issuance, and the widget
//! lifecycle relay.
//!
//! `GET /link-token` mints a widget session upstream and opens a server-side
//! donation session for it; the page then relays widget callbacks to
//! `POST /donation/events` and receives the rendered receipt panels back.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{link_token_error, ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{DonationDefaults, DonationSession, PanelPresenter};
use givefolio_connect::{DonationOrchestrator, DonationPhase, LinkSession, TransferIntent, WidgetCallback};

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTokenQuery {
    pub amount_fiat: Decimal,
    pub symbol: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetEventRequest {
    pub link_token: String,
    pub event: WidgetCallback,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    pub link_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationEventResponse {
    pub phase: DonationPhase,
    pub transfer_html: Option<String>,
    pub holdings_html: Option<String>,
    pub receipt_visible: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Expose the recipient defaults used to prefill the donation form.
async fn donation_defaults(State(state): State<Arc<AppState>>) -> Json<DonationDefaults> {
    Json(state.defaults.clone())
}

/// Mint a link token for a donation attempt and open a session for it.
async fn create_link_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LinkTokenQuery>,
) -> ApiResult<Json<LinkSession>> {
    if query.amount_fiat <= Decimal::ZERO {
        return Err(ApiError::bad_request(json!({ "error": "invalid_amount" })));
    }

    let to_address = query
        .address
        .filter(|address| !address.trim().is_empty())
        .unwrap_or_else(|| state.defaults.address.clone());
    let symbol = query
        .symbol
        .filter(|symbol| !symbol.trim().is_empty())
        .unwrap_or_else(|| state.defaults.symbol.clone());

    let intent = TransferIntent {
        user_id: state.user_id.clone(),
        amount_fiat: query.amount_fiat,
        symbol,
        to_address,
        network_id: state.network_id.clone(),
        transaction_id: state.transaction_id.clone(),
    };

    info!(
        "[Donation] Minting link token: {} {} -> {}",
        intent.amount_fiat, intent.symbol, intent.to_address
    );

    let presenter = Arc::new(PanelPresenter::default());
    let mut orchestrator = DonationOrchestrator::new(state.gateway.clone(), presenter.clone());
    let session = orchestrator
        .open_with_token(&intent)
        .await
        .map_err(link_token_error)?;

    // A new flow replaces any previous session under the same token.
    state.sessions.lock().await.insert(
        session.link_token.clone(),
        DonationSession {
            orchestrator,
            presenter,
        },
    );

    Ok(Json(session))
}

/// Relay a widget lifecycle callback into its donation session and return
/// the rendered panel state.
async fn widget_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WidgetEventRequest>,
) -> ApiResult<Json<DonationEventResponse>> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get_mut(&request.link_token)
        .ok_or_else(|| ApiError::not_found("unknown_session"))?;

    session.orchestrator.handle_callback(request.event).await;

    let panels = session.presenter.snapshot();
    Ok(Json(DonationEventResponse {
        phase: session.orchestrator.phase(),
        transfer_html: panels.transfer_html,
        holdings_html: panels.holdings_html,
        receipt_visible: panels.receipt_visible,
    }))
}

/// Return a session to the form state and discard it.
async fn reset_donation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResetRequest>,
) -> StatusCode {
    if let Some(mut session) = state.sessions.lock().await.remove(&request.link_token) {
        session.orchestrator.reset();
    } else {
        debug!("[Donation] Reset for unknown session");
    }
    StatusCode::NO_CONTENT
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/donation-defaults", get(donation_defaults))
        .route("/link-token", get(create_link_token))
        .route("/donation/events", post(widget_event))
        .route("/donation/reset", post(reset_donation))
}
