//! Core error types for the Givefolio application.
//!
//! This module defines transport-agnostic error types. The HTTP layer maps
//! these onto wire responses; the gateway client produces them from upstream
//! failures.

use serde_json::Value;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the donation application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Gateway operation failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors produced while talking to the upstream aggregation API.
///
/// The variants carry exactly what the proxy layer needs to relay: a
/// non-success upstream status keeps its body verbatim, and a 2xx response
/// missing its link token keeps the raw body for diagnostics.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never completed (connection, TLS, I/O).
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// The upstream answered, but the body was not parseable JSON.
    #[error("Upstream response was not valid JSON: {0}")]
    InvalidResponse(String),

    /// The upstream answered with a non-success status; body relayed as-is.
    #[error("Upstream returned status {status}")]
    Status { status: u16, body: Value },

    /// A link-token response without `content.linkToken`.
    #[error("Upstream response did not contain a link token")]
    MissingLinkToken { raw: Value },
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
