use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::MessageBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// `{message, error?}` failure envelope shared by every route.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: &str, error: Option<String>) -> Self {
        Self { status, message: message.to_string(), error }
    }

    /// 5xx with the generic message; the cause goes in `error`.
    pub fn server(cause: impl ToString) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error", Some(cause.to_string()))
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match &e {
            ServiceError::Validation(m) => Self::new(StatusCode::BAD_REQUEST, m, None),
            ServiceError::Forbidden(m) => Self::new(StatusCode::FORBIDDEN, m, None),
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, m, None),
            ServiceError::Model(models::errors::ModelError::Validation(m)) => Self::new(StatusCode::BAD_REQUEST, m, None),
            ServiceError::Upload(_) | ServiceError::Db(_) | ServiceError::Model(_) => Self::server(e.detail()),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = ?self.error, "request failed");
        }
        let body = MessageBody { message: self.message, error: self.error };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
