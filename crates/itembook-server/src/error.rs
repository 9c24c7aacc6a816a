//! Error types for itembook-server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use itembook_core::StoreError;

/// Errors that can end a request or stop the server from starting
#[derive(Error, Debug)]
pub enum ServerError {
    /// Item store failure (including unknown ids)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Path segment that cannot name an item
    #[error("Invalid item id: {0}")]
    InvalidId(String),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),

    /// IO error (binding, reading config)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Store(StoreError::NotFound(_)) | ServerError::InvalidId(_) => {
                StatusCode::NOT_FOUND.into_response()
            }
            ServerError::Store(StoreError::Validation(e)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
            }
            other => {
                tracing::error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itembook_core::ValidationError;

    #[test]
    fn not_found_is_blank_404() {
        let resp = ServerError::Store(StoreError::NotFound(3)).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ServerError::InvalidId("abc".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_is_422() {
        let err = ServerError::from(StoreError::from(ValidationError::EmptyField("title")));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_is_500() {
        let err = ServerError::from(StoreError::Storage("disk I/O error".into()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
