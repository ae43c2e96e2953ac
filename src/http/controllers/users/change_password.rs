use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tokio::task::spawn_blocking;
use validator::Validate;

use crate::http::{Error, ErrorKind, Identity};
use crate::models::User;
use crate::util::{crypto, validation, Sensitive};
use crate::App;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[validate(length(min = 1))]
    pub current_password: Sensitive<String>,
    pub new_password: Sensitive<String>,
}

#[tracing::instrument(skip_all, name = "controllers.users.change_password", fields(user.id = %identity.id))]
pub async fn post(
    app: web::Data<App>,
    identity: Identity,
    request: web::Json<PostRequest>,
) -> Result<HttpResponse, Error> {
    request.validate()?;
    let PostRequest {
        current_password,
        new_password,
    } = request.into_inner();

    let mut conn = app.db().await?;
    let user = User::by_id(&mut conn, identity.id)
        .await?
        .ok_or_else(|| Error::new(ErrorKind::NotFound))?;

    // Mirrors login's error policy: a wrong current password is reported
    // exactly like bad login credentials.
    let current = current_password.into_inner();
    let stored_hash = user.password_hash.clone();
    let matched =
        spawn_blocking(move || crypto::verify(current.as_bytes(), &stored_hash)).await??;
    if !matched {
        return Err(Error::new(ErrorKind::InvalidCredentials));
    }

    if !validation::is_valid_password(new_password.as_str()) {
        return Err(Error::new(ErrorKind::InvalidInput(format!(
            "Password must be at least {} characters long",
            validation::PASSWORD_MIN,
        ))));
    }

    let new_password = new_password.into_inner();
    let password_hash = spawn_blocking(move || crypto::hash(new_password.as_bytes())).await??;
    User::update_password_hash(&mut conn, identity.id, &password_hash)
        .await?
        .ok_or_else(|| Error::new(ErrorKind::NotFound))?;

    // Tokens issued before this point stay valid until their expiry; the
    // server keeps no revocation list.
    Ok(HttpResponse::Ok().json(json!({
        "message": "Password updated successfully",
    })))
}
