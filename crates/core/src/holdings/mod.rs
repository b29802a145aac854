//! Holdings module - normalized holding rows and the shape-tolerant extractor.

mod holdings_extractor;
mod holdings_model;

pub use holdings_extractor::extract_crypto_rows;
pub use holdings_model::HoldingRow;
