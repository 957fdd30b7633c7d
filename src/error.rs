use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::jwt::{SigningError, TokenError};
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Error surfaced by every handler. Internal causes are logged, never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

pub const INVALID_TOKEN: &str = "Invalid or expired token";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const RESUME_NOT_FOUND: &str = "Resume not found";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // duplicate registration is reported as a plain 400
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg) | AppError::Conflict(msg) => msg,
            AppError::Unauthorized(msg) | AppError::NotFound(msg) => msg.to_string(),
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "internal error");
                "An internal error occurred".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => {
                AppError::Conflict("An account with this email already exists.".into())
            }
            StoreError::Backend(e) => AppError::Internal(e),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<SigningError> for AppError {
    fn from(e: SigningError) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        tracing::debug!(reason = %e, "token rejected");
        AppError::Unauthorized(INVALID_TOKEN)
    }
}
