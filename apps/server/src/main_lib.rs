use std::collections::HashMap;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::models::{DonationDefaults, DonationSession};
use givefolio_connect::{network_id_for_chain, LinkApiClient, MeshApiClient};

pub struct AppState {
    /// Gateway to the hosted integration API; carries the credentials.
    pub gateway: Arc<dyn LinkApiClient>,
    /// Recipient defaults served to the donation form.
    pub defaults: DonationDefaults,
    /// Upstream user id the donations are attributed to.
    pub user_id: String,
    /// Transaction id attached to every link-token request; fixed for the
    /// lifetime of the process.
    pub transaction_id: String,
    /// Upstream identifier of the configured chain.
    pub network_id: String,
    /// Live donation sessions, keyed by link token. The link token is
    /// already the per-session opaque credential, so no extra id is minted.
    pub sessions: tokio::sync::Mutex<HashMap<String, DonationSession>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("GF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    if config.mesh_client_id.is_empty() || config.mesh_client_secret.is_empty() {
        tracing::warn!("Integration API credentials are not set; upstream calls will be refused");
    }

    let network_id = network_id_for_chain(&config.network_chain)
        .ok_or_else(|| anyhow::anyhow!("Unknown network chain: {}", config.network_chain))?;

    let gateway: Arc<dyn LinkApiClient> = Arc::new(
        MeshApiClient::new(
            &config.mesh_api_url,
            &config.mesh_client_id,
            &config.mesh_client_secret,
        )
        .map_err(|e| anyhow::anyhow!(e.to_string()))?,
    );

    let transaction_id = config
        .transaction_id
        .clone()
        .unwrap_or_else(|| format!("donation{}", chrono::Utc::now().format("%Y%m%d")));

    Ok(Arc::new(AppState {
        gateway,
        defaults: DonationDefaults {
            address: config.recipient_address.clone(),
            symbol: config.recipient_symbol.clone(),
        },
        user_id: config.donation_user_id.clone(),
        transaction_id,
        network_id: network_id.to_string(),
        sessions: tokio::sync::Mutex::new(HashMap::new()),
    }))
}
