use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// JSON error body: `{ "error": { "title": ..., "detail": ... } }`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": { "title": self.title, "detail": self.detail }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match &e {
            ServiceError::Validation(_) | ServiceError::Model(models::errors::ModelError::Validation(_)) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()))
            }
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            ServiceError::Conflict(_) => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            ServiceError::NotImplemented(_) => {
                JsonApiError::new(StatusCode::NOT_IMPLEMENTED, "Not Implemented", Some(e.to_string()))
            }
            ServiceError::Db(_) | ServiceError::Model(models::errors::ModelError::Db(_)) => {
                error!(err = %e, "service failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string()))
            }
        }
    }
}
