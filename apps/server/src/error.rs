use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use givefolio_core::errors::{Error as CoreError, GatewayError};

/// API-level error with an explicit wire body.
///
/// The donation endpoints promise exact JSON error shapes (and verbatim
/// relay of upstream failures), so variants carry the response body rather
/// than deriving one from a message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request")]
    BadRequest(Value),
    #[error("Not found")]
    NotFound(Value),
    /// A non-success upstream response, relayed with status and body as-is.
    #[error("Upstream returned status {status}")]
    Upstream { status: u16, body: Value },
    /// A failure of our own or of the transport; `error` names the failing
    /// operation the way the frontend expects it.
    #[error("{error}: {detail}")]
    Internal { error: String, detail: String },
}

impl ApiError {
    pub fn bad_request(body: Value) -> Self {
        ApiError::BadRequest(body)
    }

    pub fn not_found(error: &str) -> Self {
        ApiError::NotFound(json!({ "error": error }))
    }

    pub fn internal(error: &str, detail: impl ToString) -> Self {
        ApiError::Internal {
            error: error.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(body) => (StatusCode::BAD_REQUEST, body),
            ApiError::NotFound(body) => (StatusCode::NOT_FOUND, body),
            ApiError::Upstream { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            ),
            ApiError::Internal { error, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": error, "detail": detail }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Map a gateway failure from the link-token path onto the wire contract.
pub fn link_token_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Gateway(GatewayError::MissingLinkToken { raw }) => {
            ApiError::bad_request(json!({ "error": "no_link_token_in_response", "raw": raw }))
        }
        CoreError::Gateway(GatewayError::Status { status, body }) => {
            ApiError::Upstream { status, body }
        }
        other => ApiError::internal("Failed to fetch token", other),
    }
}

/// Map a gateway failure from the holdings/portfolio path onto the wire
/// contract.
pub fn portfolio_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Gateway(GatewayError::Status { status, body }) => {
            ApiError::Upstream { status, body }
        }
        other => ApiError::internal("mesh_call_failed", other),
    }
}
