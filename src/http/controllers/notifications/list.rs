use actix_web::{web, HttpResponse};

use super::NotificationResponse;
use crate::http::{Error, Identity};
use crate::models::Notification;
use crate::App;

#[tracing::instrument(skip_all, name = "controllers.notifications.list", fields(user.id = %identity.id))]
pub async fn get(app: web::Data<App>, identity: Identity) -> Result<HttpResponse, Error> {
    let mut conn = app.db().await?;
    let notifications = Notification::list_for_user(&mut conn, identity.id).await?;

    let response = notifications
        .into_iter()
        .map(NotificationResponse::from)
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(response))
}
