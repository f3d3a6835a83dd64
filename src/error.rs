use crate::db::StoreError;
use crate::validation::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "student 123 not found")]
    pub message: String,
    #[schema(example = "not_found")]
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid student id {0:?}: expected a positive integer")]
    MalformedId(String),
    #[error("student {0} not found")]
    NotFound(i64),
    #[error("failed to {action}")]
    Store {
        action: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("failed to {action}: background task did not complete")]
    Task { action: &'static str },
}

impl AppError {
    pub fn store(action: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store { .. } | AppError::Task { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_failed",
            AppError::MalformedId(_) => "malformed_id",
            AppError::NotFound(_) => "not_found",
            AppError::Store { .. } | AppError::Task { .. } => "store_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store { action, source } => {
                tracing::error!("Failed to {}: {}", action, source);
            }
            // Logged where the task was joined.
            AppError::Task { .. } => {}
            other => tracing::debug!("Rejecting request: {}", other),
        }

        let body = ErrorBody {
            message: self.to_string(),
            error: self.code().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_is_not_echoed() {
        let err = AppError::store("update student")(StoreError::Unavailable(
            "password authentication failed for user \"root\"".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "failed to update student");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound(3).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::MalformedId("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(ValidationError::NoFields).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
