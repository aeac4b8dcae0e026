use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use vision::common::VisionError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub message: String,
    pub success: bool,
}

/// Error side of every upload handler; rendered as a `ProcessResponse`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<VisionError> for ApiError {
    fn from(err: VisionError) -> Self {
        let status = match &err {
            VisionError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            VisionError::ImageDecode(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("Request failed with {}: {}", self.status, self.message);
        (
            self.status,
            Json(ProcessResponse {
                message: self.message,
                success: false,
            }),
        )
            .into_response()
    }
}
