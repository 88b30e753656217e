use actix_web::{web, HttpResponse};
use secrecy::Secret;

use crate::authentication::{AuthContext, CredentialService};
use crate::errors::{AccountError, ErrorCode};
use crate::routes::ApiResponse;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
    old_password: Secret<String>,
    new_password: Secret<String>,
}

#[tracing::instrument(
    name = "Changing password",
    skip(body, auth, service),
    fields(user_id = %auth.id)
)]
pub async fn update_password(
    body: web::Json<ChangePasswordBody>,
    auth: web::ReqData<AuthContext>,
    service: web::Data<CredentialService>,
) -> Result<HttpResponse, AccountError> {
    let body = body.into_inner();
    service
        .change_password(auth.id, body.old_password, body.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(
        ErrorCode::Success,
        "Password updated successfully",
    )))
}
