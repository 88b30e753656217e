use actix_web::{web, HttpResponse};

use crate::authentication::{AuthContext, CredentialService};
use crate::errors::AccountError;
use crate::routes::ApiResponse;

#[tracing::instrument(name = "Fetching user info", skip(auth, service), fields(user_id = %auth.id))]
pub async fn get_user_info(
    auth: web::ReqData<AuthContext>,
    service: web::Data<CredentialService>,
) -> Result<HttpResponse, AccountError> {
    let profile = service.profile(auth.id, &auth.username).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(profile)))
}
