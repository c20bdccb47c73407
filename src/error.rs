use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::schemas::MemberId;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Amount must be a non-negative number, got {0}")]
    InvalidAmount(f64),
    #[error("Amount {0} exceeds 1,000,000")]
    AmountTooLarge(f64),
    #[error("Share of {member} must be a number between -1,000,000 and 1,000,000, got {value}")]
    InvalidShare { member: MemberId, value: f64 },
    #[error("An expense needs at least one participant")]
    NoParticipants,
    #[error("Member {0} appears more than once")]
    DuplicateMember(MemberId),
    #[error("Unknown member {0}")]
    UnknownMember(MemberId),
    #[error("Shares add up to {actual}, expected {expected}")]
    SplitTotalMismatch { expected: f64, actual: f64 },
    #[error("Share weight of {0} must be positive")]
    NonPositiveWeight(MemberId),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Group {0} already exists")]
    AlreadyExists(String),
    #[error("Database error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("In-memory store lock was poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Couldn't find {0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            other => ApiError::Store(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Store(err) = self {
            log::error!("{err}");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
