use chrono::{Duration, Utc};
use error_stack::{Report, Result, ResultExt};
use thiserror::Error;
use tokio::task::spawn_blocking;

use crate::models::{InsertNotification, InsertUser, Notification, User, UserRole};
use crate::util::crypto;
use crate::App;

#[derive(Debug, Error)]
#[error("Failed to run first-start provisioning")]
pub struct BootstrapError;

const ADMIN_USERNAME: &str = "admin";

/// First-start provisioning: makes sure an administrator account exists and
/// that a fresh install has something to show on the notifications screen.
/// Runs after migrations and before the server accepts requests; any
/// failure here aborts startup.
#[tracing::instrument(skip_all)]
pub async fn run(app: &App) -> Result<(), BootstrapError> {
    let mut conn = app.db().await.change_context(BootstrapError)?;

    let admin = match User::by_username(&mut conn, ADMIN_USERNAME)
        .await
        .change_context(BootstrapError)?
    {
        Some(user) if user.role != UserRole::Administrator => {
            tracing::info!("elevating the existing {ADMIN_USERNAME:?} account");
            User::update_role(&mut conn, user.id, UserRole::Administrator)
                .await
                .change_context(BootstrapError)?
                .ok_or_else(|| {
                    Report::new(BootstrapError)
                        .attach_printable("admin account vanished during provisioning")
                })?
        }
        Some(user) => user,
        None => {
            tracing::info!("no administrator found, creating the default account");

            let password = app.config.initial_admin_password.as_str().to_string();
            let password_hash = spawn_blocking(move || crypto::hash(password.as_bytes()))
                .await
                .change_context(BootstrapError)?
                .change_context(BootstrapError)?;

            User::create(
                &mut conn,
                InsertUser {
                    username: ADMIN_USERNAME,
                    password_hash: &password_hash,
                    full_name: "Admin User",
                    email: "admin@example.com",
                    phone: "+1 555 0100",
                    location: "Springfield, US",
                    role: UserRole::Administrator,
                },
            )
            .await
            .change_context(BootstrapError)?
        }
    };

    let existing = Notification::count(&mut conn)
        .await
        .change_context(BootstrapError)?;
    if existing == 0 {
        tracing::info!("seeding sample notifications for the administrator");

        let now = Utc::now().naive_utc();
        let samples = [
            InsertNotification::user_registered(admin.id, "jane@example.com")
                .at(now - Duration::minutes(5)),
            InsertNotification::report_increase(admin.id, 15).at(now - Duration::hours(1)),
            InsertNotification::security_alert(admin.id, "192.168.1.1")
                .at(now - Duration::hours(2)),
            InsertNotification::tasks_added(admin.id, 3)
                .at(now - Duration::hours(24))
                .already_read(),
        ];

        for sample in samples {
            Notification::create(&mut conn, sample)
                .await
                .change_context(BootstrapError)?;
        }
    }

    Ok(())
}
