use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderMap, AUTHORIZATION},
    web, HttpMessage,
};
use actix_web_lab::middleware::Next;
use anyhow::Context;

use super::token::{TokenError, TokenIssuer};
use crate::domains::UserId;
use crate::errors::AccountError;

/// Identity of the caller, attached to the request once its token checks out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthContext {
    pub id: UserId,
    pub username: String,
}

/// Decide whether a request may proceed. The raw token is read from the
/// `Authorization` header; a `Bearer ` prefix is tolerated but not required.
pub fn authorize(issuer: &TokenIssuer, headers: &HeaderMap) -> Result<AuthContext, AccountError> {
    let token = extract_token(headers).map_err(AccountError::AuthFailed)?;

    let claims = issuer.validate(token).map_err(|e| match e {
        TokenError::Expired => {
            tracing::info!("Rejected an expired token");
            AccountError::TokenExpired
        }
        other => {
            tracing::warn!(error.cause_chain = ?other, "Rejected an invalid token");
            AccountError::AuthFailed(other.into())
        }
    })?;

    Ok(AuthContext {
        id: claims.user_id,
        username: claims.username,
    })
}

fn extract_token(headers: &HeaderMap) -> Result<&str, anyhow::Error> {
    let header = headers
        .get(AUTHORIZATION)
        .context("The 'Authorization' header was missing")?
        .to_str()
        .context("The 'Authorization' header was not a valid string")?
        .trim();

    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        anyhow::bail!("The 'Authorization' header was empty");
    }
    Ok(token)
}

pub async fn reject_anonymous_users(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .context("No token issuer registered with the application")
        .map_err(AccountError::InternalError)?;

    let auth_context = authorize(issuer, req.headers())?;
    req.extensions_mut().insert(auth_context);
    next.call(req).await
}
