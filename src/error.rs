use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Internal classification of why a request was denied. Never surfaced to
/// callers; every variant renders as the same 401 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DenyReason {
    /// No session cookie, or the token failed verification.
    Unauthenticated,
    /// No user matches the principal's subject/issuer.
    UserNotFound,
    /// The user holds no role in the principal's organization.
    RoleNotFound,
    /// The user's role ranks below the operation's requirement.
    InsufficientRole,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("request denied: {}", .0.as_ref())]
    Unauthorized(DenyReason),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The one place a denial becomes an error. Every deny path in the
    /// pipeline funnels through here so the external response cannot drift
    /// between causes; the cause itself only reaches the server log.
    pub fn unauthorized(reason: DenyReason) -> Self {
        tracing::debug!(reason = reason.as_ref(), "authorization denied");
        AppError::Unauthorized(reason)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Wire shape for every error body: `{"code":...,"message":"..."}`.
#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Deliberately identical for all denial causes.
            AppError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, "User is not authorized".into())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Store(err) => {
                tracing::error!(error = %err, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };
        let body = ErrorBody {
            code: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
