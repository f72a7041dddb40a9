use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error("Identity service error: {0}")]
    Identity(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The bare message, without the variant prefix.
    ///
    /// This is what the admin pages show inline next to a form.
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Database(msg)
            | AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::TooManyRequests(msg)
            | AppError::Identity(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

/// Helper conversion from anyhow::Error
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    /// Convert for a server function, keeping only the user-facing message.
    ///
    /// Store and internal failures are logged and replaced by a generic text.
    pub fn into_server_fn_error(self) -> leptos::prelude::ServerFnError {
        match &self {
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Server function failed");
                leptos::prelude::ServerFnError::new(GENERIC_FAILURE)
            }
            _ => leptos::prelude::ServerFnError::new(self.user_message()),
        }
    }
}

/// Shown in place of store and internal failure details.
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Text to show for a failed server function call.
pub fn display_error(err: &leptos::prelude::ServerFnError) -> String {
    match err {
        leptos::prelude::ServerFnError::ServerError(msg) => msg.clone(),
        other => other.to_string(),
    }
}
