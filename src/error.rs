use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(e.to_string())
    }
}

/// Backstop for errors that escape a handler. Recoverable paths (validation,
/// bad credentials, registration persistence failures) are handled in the
/// handlers with flash messages; anything reaching here renders as a generic
/// internal error.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error = %self, "request failed");
        let body = Html(
            "<!doctype html>\n<html><head><title>Internal error</title></head>\
             <body><h1>Internal error</h1>\
             <p>An internal error occurred; please try again later.</p>\
             </body></html>"
                .to_string(),
        );
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
