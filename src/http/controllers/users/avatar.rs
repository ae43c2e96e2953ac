use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::ProfileResponse;
use crate::http::{Error, ErrorKind, Identity};
use crate::models::User;
use crate::util::validation;
use crate::App;

#[derive(Debug, Deserialize)]
pub struct PutRequest {
    pub avatar: String,
}

#[tracing::instrument(skip_all, name = "controllers.users.avatar.put", fields(user.id = %identity.id))]
pub async fn put(
    app: web::Data<App>,
    identity: Identity,
    request: web::Json<PutRequest>,
) -> Result<HttpResponse, Error> {
    let request = request.into_inner();
    if !validation::is_image_data_uri(&request.avatar) {
        return Err(Error::new(ErrorKind::InvalidInput(
            "Invalid image payload".to_string(),
        )));
    }

    let mut conn = app.db().await?;
    let user = User::update_avatar(&mut conn, identity.id, &request.avatar)
        .await?
        .ok_or_else(|| Error::new(ErrorKind::NotFound))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from(user)))
}
