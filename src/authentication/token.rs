use anyhow::Context;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};

use crate::configuration::TokenSettings;
use crate::domains::UserId;

pub const MIN_SECRET_LENGTH: usize = 32;

/// Payload of a session token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub username: String,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch. Valid while `now <= exp`.
    pub exp: i64,
}

#[derive(thiserror::Error)]
pub enum TokenError {
    #[error("Token is malformed or its signature does not match")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("Token has expired")]
    Expired,
    #[error("Failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("Token expiry is out of range")]
    ExpiryOutOfRange,
}

impl std::fmt::Debug for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::errors::error_chain_fmt(self, f)
    }
}

/// Issues and validates HS256 session tokens. Built once at startup from
/// the process secret and shared read-only between workers.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &Secret<String>, ttl: std::time::Duration) -> Result<Self, anyhow::Error> {
        let secret = secret.expose_secret().as_bytes();
        if secret.len() < MIN_SECRET_LENGTH {
            anyhow::bail!(
                "The token signing secret must be at least {} bytes long",
                MIN_SECRET_LENGTH
            );
        }
        let ttl = chrono::Duration::from_std(ttl).context("Token TTL is out of range")?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn from_settings(settings: &TokenSettings) -> Result<Self, anyhow::Error> {
        Self::new(&settings.secret, settings.ttl())
    }

    #[tracing::instrument(name = "Issue session token", skip(self))]
    pub fn issue(&self, user_id: UserId, username: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, username, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: UserId,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: issued_at
                .checked_add_signed(self.ttl)
                .ok_or(TokenError::ExpiryOutOfRange)?
                .timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Signature is checked before expiry: a forged token is `Invalid` even
    /// when its claimed expiry is in the past.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })
    }
}
