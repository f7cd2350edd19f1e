//! JSON envelopes and error mapping for the dashboard API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::error::Error;

/// `{"success": true, ...payload}` with the payload's fields inlined.
pub fn success(payload: Value) -> Response {
    let mut body = json!({ "success": true });
    if let (Some(body), Value::Object(fields)) = (body.as_object_mut(), payload) {
        body.extend(fields);
    }
    Json(body).into_response()
}

/// Serialize any value into a success envelope.
pub fn success_with<T: Serialize>(payload: &T) -> Response {
    match serde_json::to_value(payload) {
        Ok(value) => success(value),
        Err(e) => ApiError::from(Error::from(e)).into_response(),
    }
}

/// Error reply with a `success: false` envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Domain(e) => Self::bad_request(e.to_string()),
            Error::Source(e) => Self::bad_request(e.to_string()),
            other => {
                error!(error = %other, "Dashboard request failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: other.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "error": self.message })),
        )
            .into_response()
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response()
}
