// src/error.rs
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use thiserror::Error;
use tracing::{error, warn};

use crate::web::types::StandardErrorResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn not_found(what: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} not found: {}", what, id))
    }

    pub fn external(err: anyhow::Error) -> Self {
        AppError::ExternalService(format!("{:#}", err))
    }

    pub fn status(&self) -> Status {
        match self {
            AppError::NotFound(_) => Status::NotFound,
            AppError::BadRequest(_) | AppError::Validation(_) => Status::BadRequest,
            AppError::Unauthorized(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::Conflict(_) => Status::Conflict,
            AppError::ExternalService(_) => Status::BadGateway,
            AppError::Configuration(_) | AppError::Database(_) | AppError::Internal(_) => {
                Status::InternalServerError
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn suggestions(&self) -> Vec<String> {
        let hint = match self {
            AppError::NotFound(_) => "Check the identifier and try again",
            AppError::BadRequest(_) | AppError::Validation(_) => "Fix the request payload",
            AppError::Unauthorized(_) => "Log in and send the token as a Bearer header",
            AppError::Forbidden(_) => "This action requires different permissions",
            AppError::Conflict(_) => "The resource already exists",
            AppError::ExternalService(_) => "The upstream service failed, try again later",
            AppError::Configuration(_) => "Ask an administrator to configure this feature",
            AppError::Database(_) | AppError::Internal(_) => "Try again later",
        };
        vec![hint.to_string()]
    }

    /// Message safe to return to clients
    fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(db_error) = err
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
        {
            if db_error.is_unique_violation() {
                return AppError::Conflict("Resource already exists".to_string());
            }
        }
        AppError::Internal(err)
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("{} {} failed: {}", request.method(), request.uri(), self);
        } else {
            warn!(
                "{} {} -> {}: {}",
                request.method(),
                request.uri(),
                status.code,
                self
            );
        }

        let body = StandardErrorResponse::new(
            self.public_message(),
            self.error_code().to_string(),
            self.suggestions(),
        );
        (status, Json(body)).respond_to(request)
    }
}
