use crate::db::StoreError;
use crate::orchestration::ServiceError;
use crate::session::SessionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::FightNotFound(_) => AppError::NotFound(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidActionShape(_) | SessionError::InvalidRoundDuration(_) => {
                AppError::BadRequest(err.to_string())
            }
            SessionError::RoundNotFound(_) => AppError::NotFound(err.to_string()),
            SessionError::MissingContext(_)
            | SessionError::FightComplete
            | SessionError::RoundInProgress(_)
            | SessionError::ReplayUnavailable(_)
            | SessionError::RoundNotFinished(_)
            | SessionError::FightAlreadyDecided
            | SessionError::RoundEnding(_) => AppError::Conflict(err.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Session(e) => e.into(),
            ServiceError::Store(e) => e.into(),
            ServiceError::FightNotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        if status.is_server_error() {
            tracing::error!(error = %error_message, "Request failed");
        }

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
