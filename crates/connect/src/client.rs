//! HTTP client for the hosted integration API.
//!
//! This module provides the gateway client used by the proxy endpoints and
//! the donation orchestrator. It attaches the server-held client id/secret
//! headers to every call; nothing else in the system ever sees them.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::link::{LinkApiClient, LinkSession, TransferIntent};
use givefolio_core::errors::{Error, GatewayError, Result};

/// Default base URL for the sandbox integration API.
pub const DEFAULT_SANDBOX_API_URL: &str =
    "https://sandbox-integration-api.meshconnect.com/api/v1";

const CLIENT_ID_HEADER: HeaderName = HeaderName::from_static("x-client-id");
const CLIENT_SECRET_HEADER: HeaderName = HeaderName::from_static("x-client-secret");

/// HTTP client for the integration API.
///
/// This client provides:
/// - link-token issuance for one widget session
/// - holdings retrieval for a linked account
/// - aggregated portfolio retrieval for a user
///
/// # Example
///
/// ```ignore
/// let client = MeshApiClient::new(DEFAULT_SANDBOX_API_URL, "client-id", "secret")?;
/// let session = client.create_link_token(&intent).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MeshApiClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_id_header: HeaderValue,
    client_secret_header: HeaderValue,
}

impl MeshApiClient {
    /// Create a new integration API client.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is not a valid header value or the
    /// HTTP client cannot be initialized.
    pub fn new(base_url: &str, client_id: &str, client_secret: &str) -> Result<Self> {
        let client_id_header = HeaderValue::from_str(client_id)
            .map_err(|e| Error::Unexpected(format!("Invalid client id: {}", e)))?;
        let client_secret_header = HeaderValue::from_str(client_secret)
            .map_err(|e| Error::Unexpected(format!("Invalid client secret: {}", e)))?;

        // No request timeout: upstream calls are never retried or cancelled,
        // and a hung call must hang only its own panel.
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_id_header,
            client_secret_header,
        })
    }

    /// Create default headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CLIENT_ID_HEADER, self.client_id_header.clone());
        headers.insert(CLIENT_SECRET_HEADER, self.client_secret_header.clone());
        headers
    }

    /// Read a response body as JSON, keeping the status for the caller.
    async fn read_json(response: reqwest::Response) -> Result<(StatusCode, Value)> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(format!("Failed to read response: {}", e)))?;

        let json = serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!(
                "{} - {}",
                e,
                body.chars().take(200).collect::<String>()
            ))
        })?;

        Ok((status, json))
    }
}

#[async_trait]
impl LinkApiClient for MeshApiClient {
    /// Mint a link token for one widget session.
    ///
    /// The upstream reports request problems inside the body, so the HTTP
    /// status is not inspected: only the presence of `content.linkToken`
    /// decides, and a response without it keeps the raw body for
    /// diagnostics.
    async fn create_link_token(&self, intent: &TransferIntent) -> Result<LinkSession> {
        let url = format!("{}/linktoken", self.base_url);
        debug!("[MeshApi] POST {}", url);

        let payload = json!({
            "userId": intent.user_id,
            "transferOptions": {
                "toAddresses": [{
                    "networkId": intent.network_id,
                    "symbol": intent.symbol,
                    "address": intent.to_address,
                }],
                "isInclusiveFeeEnabled": false,
                "transactionId": intent.transaction_id,
                "amountInFiat": intent.amount_fiat,
                "generatePayLink": false,
            }
        });

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("Request failed: {}", e)))?;

        let (_status, data) = Self::read_json(response).await?;

        let link_token = data
            .get("content")
            .and_then(|content| content.get("linkToken"))
            .and_then(Value::as_str);

        match link_token {
            Some(token) => {
                info!("[MeshApi] Minted link token for user '{}'", intent.user_id);
                Ok(LinkSession {
                    link_token: token.to_string(),
                    client_id: self.client_id.clone(),
                })
            }
            None => Err(GatewayError::MissingLinkToken { raw: data }.into()),
        }
    }

    /// Fetch holdings for a linked account.
    ///
    /// A non-success upstream status is relayed with its body verbatim; a
    /// 2xx response yields its `content` object.
    async fn fetch_holdings(&self, auth_token: &str, broker_type: &str) -> Result<Value> {
        let url = format!("{}/holdings/get", self.base_url);
        debug!("[MeshApi] POST {}", url);

        let payload = json!({
            "authToken": auth_token,
            "type": broker_type,
            "includeMarketValue": true,
        });

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("Request failed: {}", e)))?;

        let (status, data) = Self::read_json(response).await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: data,
            }
            .into());
        }

        Ok(data.get("content").cloned().unwrap_or(Value::Null))
    }

    /// Fetch the aggregated portfolio for a user.
    async fn fetch_aggregated_portfolio(&self, user_id: &str) -> Result<Value> {
        let url = format!(
            "{}/holdings/portfolio?UserId={}",
            self.base_url,
            urlencoding::encode(user_id)
        );
        debug!("[MeshApi] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("Request failed: {}", e)))?;

        let (status, data) = Self::read_json(response).await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: data,
            }
            .into());
        }

        Ok(data.get("content").cloned().unwrap_or(Value::Null))
    }
}
