use std::net::SocketAddr;

use givefolio_connect::DEFAULT_SANDBOX_API_URL;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub static_dir: String,
    pub cors_allow: Vec<String>,
    pub mesh_api_url: String,
    pub mesh_client_id: String,
    pub mesh_client_secret: String,
    pub donation_user_id: String,
    pub transaction_id: Option<String>,
    pub recipient_address: String,
    pub recipient_symbol: String,
    pub network_chain: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("GF_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3001".to_string())
            .parse()
            .expect("Invalid GF_LISTEN_ADDR");
        let static_dir = std::env::var("GF_STATIC_DIR").unwrap_or_else(|_| "dist".into());
        let cors_allow = std::env::var("GF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let mesh_api_url = std::env::var("GF_MESH_API_URL")
            .unwrap_or_else(|_| DEFAULT_SANDBOX_API_URL.to_string());
        let mesh_client_id = std::env::var("GF_MESH_CLIENT_ID").unwrap_or_default();
        let mesh_client_secret = std::env::var("GF_MESH_CLIENT_SECRET").unwrap_or_default();
        let donation_user_id =
            std::env::var("GF_USER_ID").unwrap_or_else(|_| "sandboxUser001".into());
        let transaction_id = std::env::var("GF_TRANSACTION_ID").ok();
        let recipient_address = std::env::var("GF_RECIPIENT_ADDRESS")
            .unwrap_or_else(|_| "0x0Ff0000f0A0f0000F0F000000000ffFf00f0F0f0".into());
        let recipient_symbol =
            std::env::var("GF_RECIPIENT_SYMBOL").unwrap_or_else(|_| "USDC".into());
        let network_chain =
            std::env::var("GF_NETWORK_CHAIN").unwrap_or_else(|_| "ethereum".into());
        Self {
            listen_addr,
            static_dir,
            cors_allow,
            mesh_api_url,
            mesh_client_id,
            mesh_client_secret,
            donation_user_id,
            transaction_id,
            recipient_address,
            recipient_symbol,
            network_chain,
        }
    }
}
