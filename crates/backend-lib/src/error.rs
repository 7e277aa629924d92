// crates/backend-lib/src/error.rs

//! Central error types + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Failures of the authentication flow
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown user or wrong password, deliberately indistinguishable
    #[error("incorrect username or password")]
    FailedAuthentication,

    #[error("user account is suspended")]
    AccountSuspended,

    #[error("corrupt admin account")]
    CorruptAdminAccount,

    #[error("corrupt agent account")]
    CorruptAgentAccount,

    #[error("failed fetching agent partners")]
    FetchingAgentPartner,

    #[error("failed fetching partner")]
    FetchingPartner,

    #[error("failed to create JWT token")]
    TokenCreationFailed,

    #[error("unexpected signing method")]
    UnexpectedSigningMethod,

    #[error("token is invalid")]
    InvalidToken,

    #[error("you are not authorized")]
    Unauthorized,

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("invalid user identity: {0}")]
    InvalidIdentity(#[from] uuid::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::FailedAuthentication
            | AuthError::UnexpectedSigningMethod
            | AuthError::InvalidToken
            | AuthError::Unauthorized
            | AuthError::Jwt(_)
            | AuthError::InvalidIdentity(_) => StatusCode::UNAUTHORIZED,
            AuthError::AccountSuspended => StatusCode::FORBIDDEN,
            AuthError::CorruptAdminAccount
            | AuthError::CorruptAgentAccount
            | AuthError::FetchingAgentPartner
            | AuthError::FetchingPartner
            | AuthError::TokenCreationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::FailedAuthentication => "AUTH_001",
            AuthError::AccountSuspended => "AUTH_002",
            AuthError::CorruptAdminAccount => "AUTH_003",
            AuthError::CorruptAgentAccount => "AUTH_004",
            AuthError::FetchingAgentPartner => "AUTH_005",
            AuthError::FetchingPartner => "AUTH_006",
            AuthError::TokenCreationFailed => "AUTH_007",
            AuthError::UnexpectedSigningMethod => "AUTH_008",
            AuthError::InvalidToken => "AUTH_009",
            AuthError::Unauthorized => "AUTH_010",
            AuthError::Jwt(_) => "AUTH_011",
            AuthError::InvalidIdentity(_) => "AUTH_012",
        }
    }

    fn sanitized_message(&self) -> String {
        match self {
            AuthError::FailedAuthentication => "Authentication failed".to_string(),
            AuthError::AccountSuspended => "Account suspended".to_string(),
            AuthError::Unauthorized => "You are not authorized".to_string(),
            AuthError::UnexpectedSigningMethod
            | AuthError::InvalidToken
            | AuthError::Jwt(_)
            | AuthError::InvalidIdentity(_) => "Invalid or expired token".to_string(),
            _ => "An internal server error occurred".to_string(),
        }
    }
}

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(err) => err.status_code(),
            AppError::Storage(err) => match err {
                StorageError::RecordNotFound | StorageError::EmptyResult => StatusCode::NOT_FOUND,
                StorageError::DuplicateRecord => StatusCode::CONFLICT,
                StorageError::PasswordIncorrect => StatusCode::UNAUTHORIZED,
                StorageError::UnauthorizedAccess => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(err) => err.error_code(),
            AppError::Storage(_) => "STORE_001",
            AppError::Validation(_) => "VAL_001",
            AppError::Config(_) => "CFG_001",
            AppError::Internal(_) => "INT_001",
            AppError::NotFound(_) => "NF_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
            AppError::InvalidInput(_) => "VAL_002",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Auth(err) => err.sanitized_message(),
            AppError::Storage(StorageError::RecordNotFound | StorageError::EmptyResult) => {
                "Resource not found".to_string()
            },
            AppError::Storage(StorageError::DuplicateRecord) => {
                "Resource already exists".to_string()
            },
            AppError::Storage(_) => "A storage error occurred".to_string(),
            AppError::NotFound(_) => "Resource not found".to_string(),
            AppError::Validation(err) => err.to_string(),
            AppError::InvalidInput(_) => "Invalid input provided".to_string(),
            AppError::Json(_) => "Invalid request format".to_string(),
            AppError::Config(_) | AppError::Internal(_) | AppError::Io(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            tracing::error!(code = error_code, error = %self, "request failed");
        } else {
            tracing::debug!(code = error_code, error = %self, "request rejected");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
