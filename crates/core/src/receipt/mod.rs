//! Receipt module - transfer result model and display rendering.

mod receipt_model;
mod receipt_renderer;

pub use receipt_model::TransferResult;
pub use receipt_renderer::{
    escape_html, render_holdings, render_holdings_notice, render_transfer,
    HOLDINGS_UNAVAILABLE_MESSAGE, MISSING_ACCESS_TOKEN_MESSAGE, NO_POSITIONS_MESSAGE,
};
