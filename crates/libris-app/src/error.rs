use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use libris_dal::Error;
use libris_types::ValidationError;
use serde_json::json;
use tracing::error;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Value of {field} already exists")]
    Conflict { field: String },
    #[error("Store unavailable")]
    StoreUnavailable,
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::RecordNotFound(id) => ApiError::ResourceNotFound(format!("Book {id}")),
            Error::Conflict { field } => ApiError::Conflict { field },
            Error::InvalidOrderByField(field) => {
                ApiError::InvalidQuery(format!("Cannot order by {field}"))
            }
            Error::StoreUnavailable(e) => {
                error!("Store unavailable: {e}");
                ApiError::StoreUnavailable
            }
            other => {
                error!("Store error: {other}");
                ApiError::InternalError("Database error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, Json(e)).into_response(),
            ApiError::InvalidQuery(_) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
            ApiError::ResourceNotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({"error": message}))).into_response()
            }
            ApiError::Conflict { field } => (
                StatusCode::CONFLICT,
                Json(json!({"error": message, "field": field})),
            )
                .into_response(),
            ApiError::StoreUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": message}))).into_response()
            }
            ApiError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": message})))
                    .into_response()
            }
        }
    }
}
