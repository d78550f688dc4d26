//! API error types with IntoResponse
//!
//! Errors become `{"success": false, "error": <category>, "message": ...}`
//! with a matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::actions::ActionError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub struct ApiError(pub ActionError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ActionError::Validation(_) => StatusCode::BAD_REQUEST,
            ActionError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ActionError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ActionError::NotFound { .. } => StatusCode::NOT_FOUND,
            ActionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.0.category(),
            "message": self.0.public_message(),
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<ActionError> for ApiError {
    fn from(e: ActionError) -> Self {
        Self(e)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self(ActionError::Validation(e))
    }
}
