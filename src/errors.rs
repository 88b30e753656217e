use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::routes::ApiResponse;
use crate::store::StoreError;

/// Stable business codes carried in every response envelope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    Success = 200,
    InternalError = 500,
    InvalidCredentials = 1002,
    UserNotFound = 1003,
    UserAlreadyExists = 1004,
    AuthFailed = 1005,
    TokenExpired = 1006,
    PermissionDenied = 1007,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Outcome of a failed account operation, as seen by the caller.
#[derive(thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User does not exist")]
    UserNotFound,
    #[error("Authentication failed")]
    AuthFailed(#[source] anyhow::Error),
    #[error("Token expired")]
    TokenExpired,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AccountError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AccountError::InvalidCredentials(_) => ErrorCode::InvalidCredentials,
            AccountError::UserAlreadyExists => ErrorCode::UserAlreadyExists,
            AccountError::UserNotFound => ErrorCode::UserNotFound,
            AccountError::AuthFailed(_) => ErrorCode::AuthFailed,
            AccountError::TokenExpired => ErrorCode::TokenExpired,
            AccountError::PermissionDenied => ErrorCode::PermissionDenied,
            AccountError::InternalError(_) => ErrorCode::InternalError,
        }
    }
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyExists => AccountError::UserAlreadyExists,
            StoreError::NotFound => AccountError::UserNotFound,
            StoreError::Unexpected(e) => AccountError::InternalError(e),
        }
    }
}

impl std::fmt::Debug for AccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AccountError {
    fn status_code(&self) -> StatusCode {
        match self {
            AccountError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            AccountError::UserAlreadyExists => StatusCode::CONFLICT,
            AccountError::UserNotFound => StatusCode::NOT_FOUND,
            AccountError::AuthFailed(_) | AccountError::TokenExpired => StatusCode::UNAUTHORIZED,
            AccountError::PermissionDenied => StatusCode::FORBIDDEN,
            AccountError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AccountError::InternalError(_) = self {
            tracing::error!(error.cause_chain = ?self, "Request failed with an internal error");
        }
        // Display strings are caller-safe; internal causes only travel in the source chain.
        HttpResponse::build(self.status_code())
            .json(ApiResponse::<()>::message(self.code(), self.to_string()))
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
