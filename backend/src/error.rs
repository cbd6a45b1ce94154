use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::MessageResponse;
use log::error;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Failure of a storage backend operation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be reached at all (file cannot be opened, access
    /// denied, not a database). These are the errors that trigger failover.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Every pooled connection stayed checked out past the connect timeout.
    #[error("no database connection available: {0}")]
    PoolExhausted(String),
    #[error("record already exists")]
    Conflict,
    #[error("database error: {0}")]
    Database(rusqlite::Error),
    #[error("file storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON store: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed CSV store: {0}")]
    Csv(#[from] csv::Error),
}

impl StorageError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
                ErrorCode::CannotOpen | ErrorCode::PermissionDenied | ErrorCode::NotADatabase => {
                    StorageError::Unavailable(err.to_string())
                }
                ErrorCode::ConstraintViolation => StorageError::Conflict,
                _ => StorageError::Database(err),
            },
            _ => StorageError::Database(err),
        }
    }
}

/// Failure of a registration, login or token check.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing required field: {0}")]
    Validation(&'static str),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("token signing failed: {0}")]
    Token(jsonwebtoken::errors::Error),
}

/// Error returned by HTTP handlers, rendered as `{"success":false,"message":..}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("blocking task failed: {}", err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::Validation(_))
            | ApiError::Auth(AuthError::DuplicateEmail) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::InvalidCredentials)
            | ApiError::Auth(AuthError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::InvalidToken) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(MessageResponse::failure(message))
    }
}
