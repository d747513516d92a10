//! Maps domain errors to JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use repasse_core::ports::CollaboratorError;
use repasse_core::settlement::{LedgerError, SettlementError};
use repasse_shared::AppError;
use serde_json::json;
use tracing::error;

/// Handler error wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<CollaboratorError> for ApiError {
    fn from(err: CollaboratorError) -> Self {
        Self(match err {
            CollaboratorError::NotFound { entity, .. } => AppError::NotFound(entity),
            other => AppError::ExternalService(other.to_string()),
        })
    }
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::Validation(e) => Self(AppError::Validation(e.to_string())),
            SettlementError::Ledger(e) => Self(AppError::Validation(e.to_string())),
            SettlementError::Collaborator(e) => e.into(),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.to_string(),
                "recoverable": self.0.is_recoverable(),
            })),
        )
            .into_response()
    }
}
