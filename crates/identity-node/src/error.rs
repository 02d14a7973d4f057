use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use identity_core::IdentityError;

/// Wraps `IdentityError` for the HTTP layer. The mapping is:
/// `InvalidInput -> 400`, `NotFound -> 404`, `PermissionDenied -> 403`,
/// `InsufficientBudget -> 400` with a machine-readable body,
/// `Closed`/`Transport -> 503`, everything else `-> 500`.
pub struct AppError(pub IdentityError);

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            IdentityError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            IdentityError::NotFound(_) => StatusCode::NOT_FOUND,
            IdentityError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            IdentityError::InsufficientBudget { .. } => StatusCode::BAD_REQUEST,
            IdentityError::Closed | IdentityError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, tag = self.0.tag(), "request failed");
        } else {
            tracing::warn!(error = %self.0, tag = self.0.tag(), "request rejected");
        }

        (status, Json(json!({ "error": { "code": self.0.tag(), "message": self.0.to_string() } }))).into_response()
    }
}
