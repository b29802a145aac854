//! Givefolio Core - Domain entities, holdings extraction, and receipt rendering.
//!
//! This crate contains the pure business logic for Givefolio: normalizing
//! heterogeneous portfolio responses into holding rows and rendering transfer
//! receipts. It performs no I/O; the `connect` crate and the server build on
//! the types and functions defined here.

pub mod errors;
pub mod holdings;
pub mod receipt;

// Re-export common types
pub use holdings::{extract_crypto_rows, HoldingRow};
pub use receipt::TransferResult;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
