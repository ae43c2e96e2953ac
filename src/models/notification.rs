use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

use super::id::{NotificationId, UserId};
use crate::database::{Connection, ErrorExt, Result};

/// An informational event directed at a user. Only the owning user can see
/// or mutate it; deletion is a hard delete.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    User,
    System,
    Security,
    Maintenance,
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
            Self::Security => "security",
            Self::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Error)]
#[error("unrecognized notification kind: {0:?}")]
pub struct UnknownKind(String);

impl TryFrom<String> for NotificationKind {
    type Error = UnknownKind;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Self::User),
            "system" => Ok(Self::System),
            "security" => Ok(Self::Security),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(UnknownKind(value)),
        }
    }
}

#[derive(Debug)]
pub struct InsertNotification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    /// `None` lets the store stamp the row with the current time.
    pub created_at: Option<NaiveDateTime>,
}

impl InsertNotification {
    fn event(user_id: UserId, kind: NotificationKind, title: &str, message: String) -> Self {
        Self {
            user_id,
            title: title.to_string(),
            message,
            kind,
            read: false,
            created_at: None,
        }
    }

    pub fn user_registered(user_id: UserId, email: &str) -> Self {
        Self::event(
            user_id,
            NotificationKind::User,
            "New User Registration",
            format!("A new user signed up: {email}"),
        )
    }

    pub fn report_increase(user_id: UserId, percent: u32) -> Self {
        Self::event(
            user_id,
            NotificationKind::System,
            "Report Volume Up",
            format!("Monthly report count grew by {percent}%"),
        )
    }

    pub fn security_alert(user_id: UserId, source: &str) -> Self {
        Self::event(
            user_id,
            NotificationKind::Security,
            "Security Alert",
            format!("Suspicious login attempt detected from {source}"),
        )
    }

    pub fn tasks_added(user_id: UserId, count: usize) -> Self {
        Self::event(
            user_id,
            NotificationKind::Maintenance,
            "New Tasks Added",
            format!("{count} new tasks were added to the system"),
        )
    }

    #[must_use]
    pub fn at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub fn already_read(mut self) -> Self {
        self.read = true;
        self
    }
}

impl Notification {
    /// All notifications owned by `user_id`, newest first.
    #[tracing::instrument(skip_all, fields(user.id = %user_id))]
    pub async fn list_for_user(conn: &mut Connection, user_id: UserId) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"SELECT * FROM "notifications"
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC"#,
        )
        .bind(user_id)
        .fetch_all(&mut **conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all)]
    pub async fn create(conn: &mut Connection, notification: InsertNotification) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "notifications" (user_id, title, message, kind, "read", created_at)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, (now() AT TIME ZONE 'utc')))
            RETURNING *"#,
        )
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind.as_str())
        .bind(notification.read)
        .bind(notification.created_at)
        .fetch_one(&mut **conn)
        .await
        .into_db_error()
    }

    /// Flips the read flag on one owned notification. The owner filter is in
    /// the statement itself: a row that exists under another owner reports
    /// back exactly like a missing one.
    #[tracing::instrument(skip_all, fields(user.id = %user_id, id = %id))]
    pub async fn mark_read(
        conn: &mut Connection,
        user_id: UserId,
        id: NotificationId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "notifications"
            SET "read" = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING *"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut **conn)
        .await
        .into_db_error()
    }

    /// Marks every unread notification owned by `user_id` as read and
    /// returns how many rows changed.
    #[tracing::instrument(skip_all, fields(user.id = %user_id))]
    pub async fn mark_all_read(conn: &mut Connection, user_id: UserId) -> Result<u64> {
        sqlx::query(
            r#"UPDATE "notifications"
            SET "read" = TRUE
            WHERE user_id = $1 AND "read" = FALSE"#,
        )
        .bind(user_id)
        .execute(&mut **conn)
        .await
        .map(|done| done.rows_affected())
        .into_db_error()
    }

    #[tracing::instrument(skip_all, fields(user.id = %user_id, id = %id))]
    pub async fn delete(
        conn: &mut Connection,
        user_id: UserId,
        id: NotificationId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"DELETE FROM "notifications"
            WHERE id = $1 AND user_id = $2
            RETURNING *"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut **conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all)]
    pub async fn count(conn: &mut Connection) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(r#"SELECT count(*) FROM "notifications""#)
            .fetch_one(&mut **conn)
            .await
            .into_db_error()
    }
}

#[cfg(test)]
mod tests {
    use super::{InsertNotification, NotificationKind};
    use crate::models::id::UserId;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn kind_round_trips_through_storage_form() {
        for kind in [
            NotificationKind::User,
            NotificationKind::System,
            NotificationKind::Security,
            NotificationKind::Maintenance,
        ] {
            let stored = kind.as_str().to_string();
            assert_eq!(NotificationKind::try_from(stored).expect("should parse"), kind);
        }

        assert!(NotificationKind::try_from("urgent".to_string()).is_err());
    }

    #[test]
    fn kind_wire_format() {
        assert_tokens(
            &NotificationKind::Security,
            &[Token::UnitVariant {
                name: "NotificationKind",
                variant: "security",
            }],
        );
    }

    #[test]
    fn event_factories_target_the_given_owner() {
        let owner = UserId(1);

        let event = InsertNotification::user_registered(owner, "jane@example.com");
        assert_eq!(event.user_id, owner);
        assert_eq!(event.kind, NotificationKind::User);
        assert!(event.message.contains("jane@example.com"));
        assert!(!event.read);

        let event = InsertNotification::security_alert(owner, "192.168.1.1");
        assert_eq!(event.kind, NotificationKind::Security);
        assert!(event.message.contains("192.168.1.1"));

        let event = InsertNotification::tasks_added(owner, 3).already_read();
        assert_eq!(event.kind, NotificationKind::Maintenance);
        assert!(event.read);
    }
}
