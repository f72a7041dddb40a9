#[cfg(feature = "ssr")]
use axum::http::StatusCode;
#[cfg(feature = "ssr")]
use axum::response::{IntoResponse, Response};

#[cfg(feature = "ssr")]
use crate::error::AppError;

#[cfg(feature = "ssr")]
impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Identity(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body: `{"error": "<message>"}`.
///
/// Client errors carry the friendly message the admin pages show inline.
/// Store failures are logged in full but only summarized to the caller.
#[cfg(feature = "ssr")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(_) => {
                tracing::error!(error = %self, "Document store failure");
                "The document store is unavailable, please retry.".to_string()
            }
            AppError::Identity(_) | AppError::Internal(_) => {
                tracing::error!(%status, error = %self, "Request failed");
                self.user_message().to_string()
            }
            _ => self.user_message().to_string(),
        };

        (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
    }
}
