use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::id::UserId;
use crate::models::{User, UserRole};

pub mod avatar;
pub mod change_password;
pub mod check_password;
pub mod login;
pub mod profile;

/// The caller's own record as every profile endpoint returns it. The
/// password hash has no field here, so it cannot leak through any of them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub avatar: String,
    pub role: UserRole,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            location: user.location,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProfileResponse;
    use crate::models::id::UserId;
    use crate::models::{User, UserRole};

    fn sample_user() -> User {
        User {
            id: UserId(1),
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: None,
            username: "admin".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$secret$secret".to_string(),
            full_name: "Admin User".to_string(),
            email: "admin@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            location: "Springfield".to_string(),
            avatar: String::new(),
            role: UserRole::Administrator,
        }
    }

    #[test]
    fn never_serializes_the_password_hash() {
        let response = ProfileResponse::from(sample_user());
        let value = serde_json::to_value(&response).expect("should serialize");
        let object = value.as_object().expect("should be an object");

        assert!(object.contains_key("username"));
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("passwordHash"));
        assert!(!object.contains_key("password_hash"));
    }

    #[test]
    fn uses_the_client_field_names() {
        let response = ProfileResponse::from(sample_user());
        let value = serde_json::to_value(&response).expect("should serialize");
        let object = value.as_object().expect("should be an object");

        assert!(object.contains_key("fullName"));
        assert!(object.contains_key("createdAt"));
        assert_eq!(value["role"], "administrator");
    }
}
