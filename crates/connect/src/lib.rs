//! Givefolio Connect - upstream gateway client and the donation workflow.
//!
//! This crate owns the two sides of a donation: the HTTP client for the
//! hosted integration API (link-token issuance, holdings retrieval) and the
//! orchestrator that couples widget lifecycle callbacks to the holdings
//! fetch and the rendered receipt.

pub mod client;
pub mod link;

// Re-export commonly used types
pub use client::{MeshApiClient, DEFAULT_SANDBOX_API_URL};
pub use link::{
    network_id_for_chain, ConnectedPayload, DonationOrchestrator, DonationPhase, LinkApiClient,
    LinkSession, NoOpPresenter, ReceiptPresenter, TransferIntent, WidgetCallback, WidgetEvent,
    DEFAULT_BROKER_TYPE,
};
