use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::id::{NotificationId, UserId};
use crate::models::{Notification, NotificationKind};

pub mod delete;
pub mod list;
pub mod mark_all_read;
pub mod mark_read;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            is_read: notification.read,
            created_at: notification.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationResponse;
    use crate::models::id::{NotificationId, UserId};
    use crate::models::{Notification, NotificationKind};

    #[test]
    fn uses_the_client_field_names() {
        let response = NotificationResponse::from(Notification {
            id: NotificationId(4),
            user_id: UserId(1),
            title: "Security Alert".to_string(),
            message: "Suspicious login attempt detected from 192.168.1.1".to_string(),
            kind: NotificationKind::Security,
            read: false,
            created_at: chrono::Utc::now().naive_utc(),
        });

        let value = serde_json::to_value(&response).expect("should serialize");
        let object = value.as_object().expect("should be an object");

        assert!(object.contains_key("userId"));
        assert!(object.contains_key("isRead"));
        assert!(object.contains_key("createdAt"));
        assert_eq!(value["type"], "security");
    }
}
