use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use givefolio_connect::{DonationOrchestrator, ReceiptPresenter};

/// Recipient address/symbol pair used to prefill the donation form.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DonationDefaults {
    pub address: String,
    pub symbol: String,
}

/// Rendered panel state of one donation session.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPanels {
    pub transfer_html: Option<String>,
    pub holdings_html: Option<String>,
    pub receipt_visible: bool,
}

/// Presenter that buffers rendered panels so the widget-event endpoint can
/// return them to the page.
#[derive(Debug, Default)]
pub struct PanelPresenter {
    panels: Mutex<ReceiptPanels>,
}

impl PanelPresenter {
    pub fn snapshot(&self) -> ReceiptPanels {
        self.panels.lock().unwrap().clone()
    }
}

impl ReceiptPresenter for PanelPresenter {
    fn present_transfer(&self, fragment: &str) {
        self.panels.lock().unwrap().transfer_html = Some(fragment.to_string());
    }

    fn present_holdings(&self, fragment: &str) {
        self.panels.lock().unwrap().holdings_html = Some(fragment.to_string());
    }

    fn show_receipt_view(&self) {
        self.panels.lock().unwrap().receipt_visible = true;
    }

    fn show_form_view(&self) {
        // Back to the form: transient panels are cleared, not kept.
        *self.panels.lock().unwrap() = ReceiptPanels::default();
    }
}

/// One live donation session hosted by the server, keyed by its link token.
pub struct DonationSession {
    pub orchestrator: DonationOrchestrator<PanelPresenter>,
    pub presenter: std::sync::Arc<PanelPresenter>,
}
