use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::ProfileResponse;
use crate::http::{Error, ErrorKind, Identity};
use crate::models::{UpdateProfile, User};
use crate::App;

#[tracing::instrument(skip_all, name = "controllers.users.profile.get", fields(user.id = %identity.id))]
pub async fn get(app: web::Data<App>, identity: Identity) -> Result<HttpResponse, Error> {
    let mut conn = app.db().await?;
    let user = User::by_id(&mut conn, identity.id)
        .await?
        .ok_or_else(|| Error::new(ErrorKind::NotFound))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from(user)))
}

/// Partial update: fields left out of the body keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[tracing::instrument(skip_all, name = "controllers.users.profile.put", fields(user.id = %identity.id))]
pub async fn put(
    app: web::Data<App>,
    identity: Identity,
    request: web::Json<PutRequest>,
) -> Result<HttpResponse, Error> {
    let request = request.into_inner();
    let update = UpdateProfile {
        full_name: request.full_name.as_deref(),
        email: request.email.as_deref(),
        phone: request.phone.as_deref(),
        location: request.location.as_deref(),
    };

    let mut conn = app.db().await?;
    let user = User::update_profile(&mut conn, identity.id, update)
        .await?
        .ok_or_else(|| Error::new(ErrorKind::NotFound))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from(user)))
}
