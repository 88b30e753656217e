use actix_web::{web, HttpResponse};
use secrecy::Secret;

use crate::authentication::{CredentialService, Credentials, TokenIssuer};
use crate::errors::AccountError;
use crate::routes::session_token_response;

#[derive(serde::Deserialize)]
pub struct RegisterBody {
    pub username: String,
    pub password: Secret<String>,
}

#[tracing::instrument(
    name = "Registering a new user",
    skip(body, service, issuer),
    fields(username = %body.username, user_id = tracing::field::Empty)
)]
pub async fn register(
    body: web::Json<RegisterBody>,
    service: web::Data<CredentialService>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, AccountError> {
    let body = body.into_inner();
    let identity = service
        .register(Credentials {
            username: body.username,
            password: body.password,
        })
        .await?;
    tracing::Span::current().record("user_id", &tracing::field::display(&identity.id));
    tracing::info!("New user has been registered");

    session_token_response(&issuer, &identity)
}
