use actix_web::web;

pub mod notifications;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(users::login::post))
                    .route("/profile", web::get().to(users::profile::get))
                    .route("/profile", web::put().to(users::profile::put))
                    .route("/profile/avatar", web::put().to(users::avatar::put))
                    .route(
                        "/check-password",
                        web::post().to(users::check_password::post),
                    )
                    .route(
                        "/change-password",
                        web::post().to(users::change_password::post),
                    ),
            )
            .service(
                web::scope("/notifications")
                    .route("", web::get().to(notifications::list::get))
                    .route(
                        "/mark-all-read",
                        web::post().to(notifications::mark_all_read::post),
                    )
                    .route("/{id}/read", web::post().to(notifications::mark_read::post))
                    .route("/{id}", web::delete().to(notifications::delete::delete)),
            ),
    );
}
