use axum::http::StatusCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::entity::FieldError;
use crate::domain::repository::RepositoryError;
use crate::domain::submission::error::WorkflowError;

// ApiSucess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

// ApiError is a wrapper around a response that includes a status code.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    ValidationFailed(String, Vec<FieldError>),
    ConflictWithServerState(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
}

impl From<WorkflowError> for ApiError {
    fn from(value: WorkflowError) -> Self {
        let message = value.to_string();
        match value {
            WorkflowError::Forbidden { .. } => Self::Forbidden(message),
            WorkflowError::InvalidState { .. } | WorkflowError::Conflict(_) => {
                Self::ConflictWithServerState(message)
            }
            WorkflowError::NotFound(_) => Self::NotFound(message),
            WorkflowError::ValidationFailed(errors) => Self::ValidationFailed(message, errors.0),
            WorkflowError::NotApplicable { .. } => Self::UnprocessableEntity(message),
            WorkflowError::Storage(cause) => Self::from(cause),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound(what) => Self::NotFound(format!("{} not found", what)),
            RepositoryError::UniqueViolation(cause) => Self::ConflictWithServerState(cause),
            RepositoryError::DatabaseError(cause) => {
                tracing::error!("{:?}", cause);
                Self::InternalServerError("Database server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        match self {
            InternalServerError(e) => {
                tracing::error!("{}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            UnprocessableEntity(message) => error_response(StatusCode::UNPROCESSABLE_ENTITY, message),
            ValidationFailed(message, errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponseBody {
                    status_code: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                    data: ApiErrorData { message, errors },
                }),
            )
                .into_response(),
            ConflictWithServerState(message) => error_response(StatusCode::CONFLICT, message),
            Unauthorized(message) => error_response(StatusCode::UNAUTHORIZED, message),
            Forbidden(message) => error_response(StatusCode::FORBIDDEN, message),
            NotFound(message) => error_response(StatusCode::NOT_FOUND, message),
        }
    }
}

fn error_response(status_code: StatusCode, message: String) -> Response {
    (
        status_code,
        Json(ApiResponseBody::new_error(status_code, message)),
    )
        .into_response()
}

// Generic response structure shared by all API responses.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    pub status_code: u16,
    pub data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                message,
                errors: Vec::new(),
            },
        }
    }
}

/// The response data format for all error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}
