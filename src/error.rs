use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of the truck discovery workflow.
///
/// Stored inside cached snapshots, so it is `Clone` and comparable by value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Discovery(DiscoveryError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            AppError::Discovery(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Database(_) | AppError::Io(_) => {
                tracing::error!("Internal error: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_maps_to_bad_request() {
        let err = AppError::from(DiscoveryError::InvalidArgument("radius".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::Config("SNACKI_ANON_KEY must be set".into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
