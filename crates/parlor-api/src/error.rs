use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use parlor_ai::AiError;
use parlor_directory::DirectoryError;
use parlor_types::api::ErrorResponse;

/// Everything a handler can fail with.
///
/// Upstream failures of any kind (database, directory, AI) collapse into
/// `Internal`; the caller only ever sees a generic message for those.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field is missing or the body could not be parsed. 400.
    #[error("{0}")]
    Validation(String),

    /// The referenced user does not exist. 404.
    #[error("{0}")]
    NotFound(String),

    /// An upstream dependency failed. 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) => {
                debug!("Client error: {}", msg);
                msg.clone()
            }
            ApiError::Internal(detail) => {
                error!("Server error: {}", detail);
                "Internal Server Error".to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("database: {:#}", err))
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        ApiError::Internal(format!("directory: {}", err))
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        ApiError::Internal(format!("ai: {}", err))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("spawn_blocking join error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(AiError::EmptyReply).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_errors_are_internal() {
        let err = ApiError::from(DirectoryError::Api { status: 503, message: "down".into() });
        assert!(matches!(err, ApiError::Internal(ref d) if d.starts_with("directory:")));

        let err = ApiError::from(anyhow::anyhow!("disk full"));
        assert!(matches!(err, ApiError::Internal(ref d) if d.contains("disk full")));
    }
}
