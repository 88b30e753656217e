use actix_web::{web, HttpResponse};
use secrecy::Secret;

use crate::authentication::{CredentialService, Credentials, TokenIssuer};
use crate::errors::AccountError;
use crate::routes::session_token_response;

#[derive(serde::Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: Secret<String>,
}

#[tracing::instrument(
    name = "Logging in user",
    skip(body, service, issuer),
    fields(username = %body.username, user_id = tracing::field::Empty)
)]
pub async fn login(
    body: web::Json<LoginBody>,
    service: web::Data<CredentialService>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, AccountError> {
    let body = body.into_inner();
    let credentials = Credentials {
        username: body.username,
        password: body.password,
    };

    let identity = service.login(credentials).await?;
    tracing::Span::current().record("user_id", &tracing::field::display(&identity.id));

    session_token_response(&issuer, &identity)
}
