pub mod id;
pub mod notification;
pub mod user;

pub use notification::{InsertNotification, Notification, NotificationKind};
pub use user::{InsertUser, UpdateProfile, User, UserRole};
