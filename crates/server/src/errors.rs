use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::appointment::{domain::FieldError, AppointmentError};
use tracing::{error, warn};

/// JSON error body: either a list of field errors or a single message.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Fields { errors: Vec<FieldError> },
    Message { error: String },
}

#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: ErrorBody::Message { error: message.into() } }
    }

    pub fn fields(errors: Vec<FieldError>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, body: ErrorBody::Fields { errors } }
    }
}

impl From<AppointmentError> for JsonApiError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::Validation(errors) => Self::fields(errors),
            AppointmentError::NotFound => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            AppointmentError::Repository(msg) => {
                error!(code = 2200, error = %msg, "store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            other => {
                warn!(code = other.code(), error = %other, "request rejected");
                Self::new(StatusCode::BAD_REQUEST, other.to_string())
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
