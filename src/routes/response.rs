use actix_web::{web, HttpResponse};
use anyhow::Context;

use crate::authentication::TokenIssuer;
use crate::domains::Identity;
use crate::errors::{AccountError, ErrorCode};

/// Envelope shared by every JSON response.
#[derive(serde::Serialize, Debug)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            code: ErrorCode::Success.as_u16(),
            message: "Success".into(),
            data: Some(data),
        }
    }

    pub fn message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

/// Issue a token for `identity` and wrap it in a success envelope.
pub(crate) fn session_token_response(
    issuer: &TokenIssuer,
    identity: &Identity,
) -> Result<HttpResponse, AccountError> {
    let token = issuer
        .issue(identity.id, &identity.username)
        .context("Failed to issue session token")?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(token)))
}

/// Bodies that fail to deserialize are reported in the envelope instead of
/// actix's plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!(error = %err, "Rejected a malformed request body");
        AccountError::InvalidCredentials("Invalid request format".into()).into()
    })
}
