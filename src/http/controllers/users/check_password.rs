use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use validator::Validate;

use crate::http::{Error, ErrorKind, Identity};
use crate::models::User;
use crate::util::{crypto, Sensitive};
use crate::App;

#[derive(Debug, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(length(min = 1))]
    pub password: Sensitive<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub is_valid: bool,
}

/// Confirmation step before a sensitive change; reads the stored hash and
/// mutates nothing.
#[tracing::instrument(skip_all, name = "controllers.users.check_password", fields(user.id = %identity.id))]
pub async fn post(
    app: web::Data<App>,
    identity: Identity,
    request: web::Json<PostRequest>,
) -> Result<HttpResponse, Error> {
    request.validate()?;

    let mut conn = app.db().await?;
    let user = User::by_id(&mut conn, identity.id)
        .await?
        .ok_or_else(|| Error::new(ErrorKind::NotFound))?;
    drop(conn);

    let candidate = request.into_inner().password.into_inner();
    let is_valid =
        spawn_blocking(move || crypto::verify(candidate.as_bytes(), &user.password_hash))
            .await??;

    Ok(HttpResponse::Ok().json(PostResponse { is_valid }))
}
