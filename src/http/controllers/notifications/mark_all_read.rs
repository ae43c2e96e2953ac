use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::http::{Error, Identity};
use crate::models::Notification;
use crate::App;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub modified_count: u64,
}

/// Bulk flip of every unread notification the caller owns. Zero changed
/// rows is a normal outcome, not an error.
#[tracing::instrument(skip_all, name = "controllers.notifications.mark_all_read", fields(user.id = %identity.id))]
pub async fn post(app: web::Data<App>, identity: Identity) -> Result<HttpResponse, Error> {
    let mut conn = app.db().await?;
    let modified_count = Notification::mark_all_read(&mut conn, identity.id).await?;

    Ok(HttpResponse::Ok().json(PostResponse { modified_count }))
}
