use std::sync::OnceLock;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Whether 500 responses carry the underlying error message. Set once at
/// startup from the operating mode; unset defaults to the generic text.
static VERBOSE_ERRORS: OnceLock<bool> = OnceLock::new();

pub fn set_verbose_errors(enabled: bool) {
    let _ = VERBOSE_ERRORS.set(enabled);
}

fn verbose_errors() -> bool {
    *VERBOSE_ERRORS.get().unwrap_or(&false)
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{error}: {details}")]
    Validation { error: String, details: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid hazard ID: {0}")]
    InvalidId(String),

    #[error("File too large. Max 10MB.")]
    UploadTooLarge,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Wire shape for every error response: `{error, details?}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    fn internal_body(message: &str) -> ErrorBody {
        let details = if verbose_errors() {
            message.to_string()
        } else {
            "Something went wrong".to_string()
        };
        ErrorBody {
            error: "Internal server error".to_string(),
            details: Some(details),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Self::internal_body(&e.to_string()),
                )
            }
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: msg,
                    details: None,
                },
            ),
            AppError::Validation { error, details } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    details: Some(details),
                },
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    details: None,
                },
            ),
            AppError::InvalidId(ref raw) => {
                tracing::debug!("Rejected malformed hazard id: {}", raw);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: "Invalid hazard ID".to_string(),
                        details: None,
                    },
                )
            }
            AppError::UploadTooLarge => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "File too large. Max 10MB.".to_string(),
                    details: None,
                },
            ),
            AppError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, Self::internal_body(msg))
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, Self::internal_body(msg))
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, body) = body_json(AppError::NotFound("Hazard not found".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Hazard not found");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn invalid_id_maps_to_400_with_fixed_message() {
        let (status, body) = body_json(AppError::InvalidId("not-a-uuid".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid hazard ID");
    }

    #[tokio::test]
    async fn upload_too_large_maps_to_400_with_fixed_message() {
        let (status, body) = body_json(AppError::UploadTooLarge).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "File too large. Max 10MB.");
    }

    #[tokio::test]
    async fn validation_carries_context_and_details() {
        let (status, body) = body_json(AppError::Validation {
            error: "Failed to create hazard".to_string(),
            details: "`description` is required".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Failed to create hazard");
        assert_eq!(body["details"], "`description` is required");
    }

    #[tokio::test]
    async fn internal_error_hides_details_by_default() {
        let (status, body) = body_json(AppError::Internal("pool exhausted".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["details"], "Something went wrong");
    }
}
