//! Error types shared by the store adapter and the HTTP handlers.
//!
//! Store failures are typed with [`StoreError`]. Everything a handler can fail
//! with is funnelled through [`ApiError`], which renders a JSON body carrying a
//! human-readable `detail`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::helpers::truncate::truncate_message;

/// Longest error message returned to a client for a store failure.
pub const MAX_DETAIL_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The adapter never finished initializing; operations fail fast.
    #[error("Database not available: {0}")]
    Unavailable(String),
    #[error("Database error: {0}")]
    Backend(String),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// A schema violation on an inbound reservation payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The request could not be decoded at all (bad JSON, wrong content type,
    /// unparsable query string).
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize, Debug)]
struct ErrorBody {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    detail: err.to_string(),
                    field: Some(err.field),
                },
            ),
            ApiError::Rejected { status, detail } => (status, ErrorBody { detail, field: None }),
            ApiError::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    detail: truncate_message(&err.to_string(), MAX_DETAIL_CHARS),
                    field: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
