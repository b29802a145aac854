//! Traits defining the contract for the upstream gateway.

use async_trait::async_trait;
use serde_json::Value;

use super::models::{LinkSession, TransferIntent};
use givefolio_core::errors::Result;

/// Trait for the hosted integration API the proxy forwards to.
///
/// Implementations attach the server-held credentials; callers never see
/// them. Holdings-style responses are returned as raw JSON because the
/// upstream schema is not contractually stable (see the extractor).
#[async_trait]
pub trait LinkApiClient: Send + Sync {
    /// Mint a link session authorizing one widget session.
    async fn create_link_token(&self, intent: &TransferIntent) -> Result<LinkSession>;

    /// Fetch holdings for a linked account; returns the upstream `content`.
    async fn fetch_holdings(&self, auth_token: &str, broker_type: &str) -> Result<Value>;

    /// Fetch the aggregated portfolio for a user; returns the upstream
    /// `content`.
    async fn fetch_aggregated_portfolio(&self, user_id: &str) -> Result<Value>;
}
