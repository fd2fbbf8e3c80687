use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Response for an error
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Failures raised while normalizing or persisting drafts
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("{0}")]
    Validation(String),
    #[error("draft '{0}' not found")]
    NotFound(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<DraftError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
            }
            DraftError::NotFound(_) => (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found"))),
            DraftError::Storage(message) => {
                // Internal details stay in the log
                error!("Storage failure: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
            }
        }
    }
}
