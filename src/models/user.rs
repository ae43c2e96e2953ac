use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

use super::id::UserId;
use crate::database::{Connection, ErrorExt, Result};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub avatar: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Administrator,
    Member,
}

impl UserRole {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Member => "member",
        }
    }
}

#[derive(Debug, Error)]
#[error("unrecognized user role: {0:?}")]
pub struct UnknownRole(String);

impl TryFrom<String> for UserRole {
    type Error = UnknownRole;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "administrator" => Ok(Self::Administrator),
            "member" => Ok(Self::Member),
            _ => Err(UnknownRole(value)),
        }
    }
}

#[derive(Debug)]
pub struct InsertUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub location: &'a str,
    pub role: UserRole,
}

/// Partial profile update. `None` leaves the stored value untouched.
#[derive(Debug, Default)]
pub struct UpdateProfile<'a> {
    pub full_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub location: Option<&'a str>,
}

impl User {
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn by_id(conn: &mut Connection, id: UserId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut **conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip(conn, username), fields(username = "<hidden>"))]
    pub async fn by_username(conn: &mut Connection, username: &str) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE username = $1"#)
            .bind(username)
            .fetch_optional(&mut **conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all)]
    pub async fn create(conn: &mut Connection, user: InsertUser<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "users" (username, password_hash, full_name, email, phone, location, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *"#,
        )
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.full_name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.location)
        .bind(user.role.as_str())
        .fetch_one(&mut **conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn update_profile(
        conn: &mut Connection,
        id: UserId,
        update: UpdateProfile<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "users"
            SET full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                location = COALESCE($5, location),
                updated_at = (now() AT TIME ZONE 'utc')
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(update.full_name)
        .bind(update.email)
        .bind(update.phone)
        .bind(update.location)
        .fetch_optional(&mut **conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn update_avatar(
        conn: &mut Connection,
        id: UserId,
        avatar: &str,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "users"
            SET avatar = $2, updated_at = (now() AT TIME ZONE 'utc')
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(avatar)
        .fetch_optional(&mut **conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn update_password_hash(
        conn: &mut Connection,
        id: UserId,
        password_hash: &str,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "users"
            SET password_hash = $2, updated_at = (now() AT TIME ZONE 'utc')
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&mut **conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn update_role(
        conn: &mut Connection,
        id: UserId,
        role: UserRole,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "users"
            SET role = $2, updated_at = (now() AT TIME ZONE 'utc')
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&mut **conn)
        .await
        .into_db_error()
    }
}

#[cfg(test)]
mod tests {
    use super::UserRole;

    #[test]
    fn role_round_trips_through_storage_form() {
        for role in [UserRole::Administrator, UserRole::Member] {
            let stored = role.as_str().to_string();
            assert_eq!(UserRole::try_from(stored).expect("should parse"), role);
        }

        assert!(UserRole::try_from("owner".to_string()).is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Administrator).expect("should serialize"),
            r#""administrator""#
        );
        assert_eq!(
            serde_json::to_string(&UserRole::Member).expect("should serialize"),
            r#""member""#
        );
    }
}
