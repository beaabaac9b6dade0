use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use stockledger_core::DomainError;
use stockledger_infra::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> Response {
    match err {
        LedgerError::Domain(err) => domain_error_to_response(err),
        LedgerError::Store(err) => {
            tracing::error!(error = %err, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InsufficientStock { .. } | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::InvalidAdjustment(_) | DomainError::InvalidTransition { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path or body id, answering 400 `invalid_id` on failure.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id")))
}
