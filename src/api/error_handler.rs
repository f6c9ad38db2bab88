use crate::database::DatabaseError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("user not found")]
    NotFound,
    #[error("storage error")]
    Storage(DatabaseError),
    #[error("invalid request body")]
    InvalidBody(String),
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::UserNotFound => ApiError::NotFound,
            other => ApiError::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

// Clients only ever see the generic message, details go to the log
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage(e) => error!(err = %e, "Storage failure"),
            ApiError::InvalidBody(detail) => warn!(detail = %detail, "Rejected request body"),
            ApiError::NotFound => {}
        }
        let body = ErrorMessage {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
