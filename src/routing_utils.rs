use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::{FromRequest, FromRequestParts};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::todo::driving_ports::TodoError;

pub const MISSING_JSON_MESSAGE: &str = "Missing JSON";
pub const NOT_FOUND_MESSAGE: &str = "Todo not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Could not access data to complete your request";

/// Body of every failed API response
#[derive(Serialize, Debug, ToSchema)]
#[cfg_attr(test, derive(serde::Deserialize, PartialEq, Eq))]
pub struct ErrorMessage {
    #[schema(example = "Title is required")]
    pub error: String,
}

impl ErrorMessage {
    fn response(status: StatusCode, message: impl Into<String>) -> Response {
        (
            status,
            axum::Json(ErrorMessage {
                error: message.into(),
            }),
        )
            .into_response()
    }
}

/// Response type that turns domain failures into [ErrorMessage] bodies with a matching status
#[derive(Debug)]
pub enum ApiErrorResponse {
    InvalidInput(String),
    NotFound,
    InternalFailure,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidInput(message) => ErrorMessage::response(StatusCode::BAD_REQUEST, message),
            Self::NotFound => ErrorMessage::response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            Self::InternalFailure => {
                ErrorMessage::response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl From<TodoError> for ApiErrorResponse {
    fn from(value: TodoError) -> Self {
        match value {
            TodoError::InvalidTitle(title_err) => Self::InvalidInput(title_err.to_string()),
            TodoError::NotFound(_) => Self::NotFound,
            TodoError::PortError(_) => Self::InternalFailure,
        }
    }
}

/// Wrapper for [axum::Json] which answers unusable request bodies with our
/// "Missing JSON" error instead of axum's plain text rejection
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing a body that couldn't be read as a JSON object
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        debug!("Rejected request body: {}", self.parse_problem);
        ErrorMessage::response(StatusCode::BAD_REQUEST, MISSING_JSON_MESSAGE)
    }
}

/// Wrapper for [axum::extract::Path] on routes keyed by a todo ID. A segment that can't be the
/// ID of a stored todo, like a word or a number past the range of the ID column, gets the same
/// answer as any other unknown todo.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiErrorResponse))]
pub struct Path<T>(pub T);

impl From<PathRejection> for ApiErrorResponse {
    fn from(value: PathRejection) -> Self {
        debug!("Treating unusable todo ID as unknown: {}", value.body_text());
        Self::NotFound
    }
}
