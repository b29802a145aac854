//! Donation link workflow: widget payload models, gateway and display
//! seams, and the orchestrator tying them together.

pub mod models;
pub mod orchestrator;
pub mod presenter;
pub mod traits;

pub use models::{
    network_id_for_chain, AccountToken, ConnectedPayload, LinkSession, TransferIntent,
    WidgetCallback, WidgetEvent, DEFAULT_BROKER_TYPE,
};
pub use orchestrator::{DonationOrchestrator, DonationPhase};
pub use presenter::{NoOpPresenter, ReceiptPresenter};
pub use traits::LinkApiClient;
