use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Upstream fetch failed: {0}")]
    Fetch(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "I/O error occurred".to_string(),
                )
            }
            AppError::Csv(ref e) => {
                tracing::error!("CSV parse error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Dataset parse error".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Fetch(ref msg) => {
                tracing::error!("Upstream fetch failed: {}", msg);
                (StatusCode::BAD_GATEWAY, format!("資料更新失敗: {}", msg))
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
