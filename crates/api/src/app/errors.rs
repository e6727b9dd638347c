use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockledger_infra::LedgerError;

/// Map a ledger/catalog failure onto the error envelope.
///
/// `action` completes "failed to ..." for server-side failures.
pub fn ledger_error_to_response(err: LedgerError, action: &str) -> axum::response::Response {
    let detail = err.to_string();
    match err {
        LedgerError::InvalidAmountSign(_) => invalid_input("invalid_amount_sign", detail),
        LedgerError::InsufficientStock(_) => invalid_input("insufficient_stock", detail),
        LedgerError::IncompleteAmountChange => invalid_input("incomplete_amount_change", detail),
        LedgerError::RevertUnderflow(_) => invalid_input("revert_underflow", detail),
        LedgerError::Validation(_) => invalid_input("validation_error", detail),
        LedgerError::NotFound(entity) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{entity} not found"),
            detail,
        ),
        LedgerError::ContentionRetryExhausted { .. } => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "contention_retry_exhausted",
            format!("failed to {action}"),
            detail,
        ),
        LedgerError::Store(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            format!("failed to {action}"),
            detail,
        ),
    }
}

/// Unreadable or mistyped JSON bodies are input errors, never 400/415.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    invalid_input("invalid_body", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "invalid_query",
        "invalid query string",
        rejection.body_text(),
    )
}

pub fn invalid_id(entity: &str) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "invalid_id",
        format!("invalid {entity} id"),
        format!("{entity} id must be a UUID"),
    )
}

fn invalid_input(code: &'static str, detail: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::UNPROCESSABLE_ENTITY, code, "invalid input", detail)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    detail: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "code": status.as_u16(),
            "message": message.into(),
            "error": code,
            "detail": detail.into(),
        })),
    )
        .into_response()
}
