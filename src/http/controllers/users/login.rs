use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use validator::Validate;

use crate::http::{Error, ErrorKind, Jwt};
use crate::models::User;
use crate::util::{crypto, Sensitive};
use crate::App;

#[derive(Debug, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(length(min = 1))]
    pub username: Sensitive<String>,
    #[validate(length(min = 1))]
    pub password: Sensitive<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub token: String,
}

#[tracing::instrument(skip_all, name = "controllers.users.login")]
pub async fn post(
    app: web::Data<App>,
    request: web::Json<PostRequest>,
) -> Result<HttpResponse, Error> {
    request.validate()?;
    let PostRequest { username, password } = request.into_inner();

    let mut conn = app.db().await?;
    let user = User::by_username(&mut conn, username.as_str()).await?;
    drop(conn);

    // One verification runs on every attempt; unknown usernames get the
    // dummy hash so they are not cheaper to probe than wrong passwords.
    let stored_hash = user
        .as_ref()
        .map_or_else(|| crypto::DUMMY_HASH.to_string(), |u| u.password_hash.clone());
    let password = password.into_inner();
    let matched = spawn_blocking(move || crypto::verify(password.as_bytes(), &stored_hash)).await??;

    let Some(user) = user else {
        return Err(Error::new(ErrorKind::InvalidCredentials));
    };

    if !matched {
        return Err(Error::new(ErrorKind::InvalidCredentials));
    }

    let token = Jwt::generate(user.id, user.username).encode(&app.config)?;
    Ok(HttpResponse::Ok().json(PostResponse { token }))
}
