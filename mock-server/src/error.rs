//! Backend error responses.
//!
//! Rule violations answer 400 with `{"message": ..}`, the body the client
//! surfaces verbatim. Unknown resources answer 404 with `{"detail": ..}`,
//! which carries no `message`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found.")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
            }
            AppError::BadRequest(message) => {
                tracing::debug!(%message, "Rejected request");
                (StatusCode::BAD_REQUEST, Json(json!({"message": message}))).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
