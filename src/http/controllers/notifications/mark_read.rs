use actix_web::{web, HttpResponse};

use super::NotificationResponse;
use crate::http::{Error, ErrorKind, Identity};
use crate::models::id::NotificationId;
use crate::models::Notification;
use crate::App;

#[tracing::instrument(skip_all, name = "controllers.notifications.mark_read", fields(user.id = %identity.id))]
pub async fn post(
    app: web::Data<App>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let id = NotificationId(path.into_inner());

    let mut conn = app.db().await?;
    let notification = Notification::mark_read(&mut conn, identity.id, id)
        .await?
        .ok_or_else(|| Error::new(ErrorKind::NotFound))?;

    Ok(HttpResponse::Ok().json(NotificationResponse::from(notification)))
}
