// src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

pub mod generation;
pub use generation::*;

pub mod project;
pub use project::*;

pub mod team;
pub use team::*;

// Custom error types
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    InternalServerError,
    BadRequest(String),
    NotFound,
    Conflict(String),
    UploadFailed(String),
}

// Implement Display for ServiceError
impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InternalServerError => write!(f, "Internal Server Error"),
            ServiceError::BadRequest(msg) => write!(f, "BadRequest: {}", msg),
            ServiceError::NotFound => write!(f, "Not Found"),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::UploadFailed(reason) => write!(f, "Upload failed: {}", reason),
        }
    }
}

impl std::error::Error for ServiceError {}

// Implement ResponseError for ServiceError
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError =>
                HttpResponse::InternalServerError().json("Internal Server Error"),
            ServiceError::BadRequest(ref message) =>
                HttpResponse::BadRequest().json(message),
            ServiceError::NotFound =>
                HttpResponse::NotFound().json("Not Found"),
            ServiceError::Conflict(ref message) =>
                HttpResponse::Conflict().json(message),
            ServiceError::UploadFailed(ref reason) =>
                HttpResponse::BadGateway().json(json!({
                    "error": "upload failed",
                    "reason": reason,
                    "retryable": true
                })),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ServiceError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        ServiceError::InternalServerError
    }
}
