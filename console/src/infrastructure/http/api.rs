use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use editorial_common::FieldErrors;
use serde::Serialize;

use crate::domain::error::{REVIEW_FIELDS, SubmitFailure, WorkflowError};

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
    BadRequest(String),
    UnprocessableEntity(String),
    InvalidFields(FieldErrors),
    ConflictWithServerState(String),
    BadGateway(String),
    ServiceUnavailable(String),
    NotFound(String),
}

impl From<WorkflowError> for ApiError {
    fn from(value: WorkflowError) -> Self {
        match value {
            WorkflowError::FetchFailed(message) => Self::BadGateway(message),
            WorkflowError::LookupFailed(message) => Self::NotFound(message),
            WorkflowError::TransitionFailed(message) => Self::BadGateway(message),
            err @ WorkflowError::TransitionPending(_) => {
                Self::ConflictWithServerState(err.to_string())
            }
            err @ WorkflowError::TransitionNotAllowed { .. } => {
                Self::UnprocessableEntity(err.to_string())
            }
            WorkflowError::ValidationFailed(failure) => match failure {
                SubmitFailure::Fields(fields) => Self::InvalidFields(fields),
                SubmitFailure::General(message) => Self::BadGateway(message),
                unreachable @ SubmitFailure::Unreachable => {
                    Self::ServiceUnavailable(unreachable.message().to_string())
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        let (status, data) = match self {
            BadRequest(message) => (StatusCode::BAD_REQUEST, ApiErrorData::message(message)),
            UnprocessableEntity(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ApiErrorData::message(message))
            }
            InvalidFields(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorData {
                    message: REVIEW_FIELDS.to_string(),
                    fields,
                },
            ),
            ConflictWithServerState(message) => {
                (StatusCode::CONFLICT, ApiErrorData::message(message))
            }
            BadGateway(message) => {
                tracing::warn!("{}", message);
                (StatusCode::BAD_GATEWAY, ApiErrorData::message(message))
            }
            ServiceUnavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, ApiErrorData::message(message))
            }
            NotFound(message) => (StatusCode::NOT_FOUND, ApiErrorData::message(message)),
        };

        (status, Json(ApiResponseBody::new(status, data))).into_response()
    }
}

// Generic response structure shared by all API responses.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    pub status_code: u16,
    pub data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

/// The response data format for all error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub fields: FieldErrors,
}

impl ApiErrorData {
    fn message(message: String) -> Self {
        Self {
            message,
            fields: FieldErrors::new(),
        }
    }
}
