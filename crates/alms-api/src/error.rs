use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use alms_ledger::LedgerError;

/// Every failure body is `{"error": <message>}`. Expected failures carry
/// their own message; internal ones are logged in full and answered with a
/// generic body unless the server runs in development mode.
pub enum ApiError {
    Status(StatusCode, String),
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Status(StatusCode::UNAUTHORIZED, message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Status(StatusCode::CONFLICT, message.into())
    }
}

fn status_for(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::InvalidAmount
        | LedgerError::MissingField(_)
        | LedgerError::PinFormat
        | LedgerError::InsufficientFunds => StatusCode::BAD_REQUEST,
        LedgerError::WrongPin => StatusCode::UNAUTHORIZED,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Conflict(_) => StatusCode::CONFLICT,
        LedgerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        if let LedgerError::Store(e) = err {
            return Self::Internal(e);
        }
        Self::Status(status_for(&err), err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

fn dev_mode() -> bool {
    std::env::var("ALMS_ENV").map(|v| v == "development").unwrap_or(false)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Status(status, message) => (status, message),
            Self::Internal(err) => {
                error!("internal error: {:#}", err);
                let message = if dev_mode() {
                    format!("An unexpected error occurred: {:#}", err)
                } else {
                    "An unexpected error occurred".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
