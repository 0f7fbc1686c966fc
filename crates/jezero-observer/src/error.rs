//! Error types for the Observer API server.
//!
//! [`ObserverError`] converts into an Axum response carrying a JSON body of
//! the form `{"error": <message>, "status": <code>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jezero_types::ParseIdentError;

/// Errors that can occur in the Observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A path segment or query parameter was not understood.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<ParseIdentError> for ObserverError {
    fn from(err: ParseIdentError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
