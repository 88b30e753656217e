use actix_web::{web, HttpResponse};

use crate::authentication::{AuthContext, CredentialService};
use crate::errors::{AccountError, ErrorCode};
use crate::routes::ApiResponse;

#[tracing::instrument(name = "Deleting user", skip(auth, service), fields(user_id = %auth.id))]
pub async fn delete_user(
    auth: web::ReqData<AuthContext>,
    service: web::Data<CredentialService>,
) -> Result<HttpResponse, AccountError> {
    service.delete_account(auth.id).await?;
    tracing::info!("User account deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(
        ErrorCode::Success,
        "User deleted successfully",
    )))
}
