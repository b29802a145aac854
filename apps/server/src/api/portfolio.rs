//! Portfolio proxy endpoints.
//!
//! Thin passthroughs to the upstream aggregation API: the server only
//! attaches credentials and relays the `content` object (or the upstream
//! failure) back to the page.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{portfolio_error, ApiError, ApiResult};
use crate::main_lib::AppState;
use givefolio_connect::DEFAULT_BROKER_TYPE;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsRequest {
    pub auth_token: Option<String>,
    #[serde(rename = "type")]
    pub broker_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedQuery {
    pub user_id: Option<String>,
}

/// Fetch holdings for a linked account.
async fn get_holdings(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HoldingsRequest>,
) -> ApiResult<Json<Value>> {
    let Some(auth_token) = request.auth_token.filter(|token| !token.is_empty()) else {
        return Err(ApiError::bad_request(json!({ "error": "authToken_required" })));
    };
    let broker_type = request
        .broker_type
        .unwrap_or_else(|| DEFAULT_BROKER_TYPE.to_string());

    info!("[Portfolio] Fetching holdings (type={})", broker_type);

    let content = state
        .gateway
        .fetch_holdings(&auth_token, &broker_type)
        .await
        .map_err(portfolio_error)?;
    Ok(Json(content))
}

/// Fetch the aggregated portfolio for a user.
async fn get_aggregated_portfolio(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AggregatedQuery>,
) -> ApiResult<Json<Value>> {
    let user_id = query
        .user_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| state.user_id.clone());

    info!("[Portfolio] Fetching aggregated portfolio for '{}'", user_id);

    let content = state
        .gateway
        .fetch_aggregated_portfolio(&user_id)
        .await
        .map_err(portfolio_error)?;
    Ok(Json(content))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio/holdings", post(get_holdings))
        .route("/portfolio/aggregated", get(get_aggregated_portfolio))
}
