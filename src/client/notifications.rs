use tokio::sync::watch;

use crate::models::id::NotificationId;
use crate::models::Notification;

/// A change to the client-held notification list. Patches carry the same
/// semantics as the server operations they mirror.
#[derive(Debug, Clone)]
pub enum NotificationPatch {
    /// Inserts a fetched notification, or replaces the held copy with the
    /// same id.
    Upsert(Notification),
    MarkRead(NotificationId),
    MarkAllRead,
    Remove(NotificationId),
}

/// The single owned notification list every screen reads from. All writes
/// go through [`apply_patch`](Self::apply_patch), so within one session a
/// read issued after a patch always sees that patch applied.
#[derive(Debug)]
pub struct NotificationStore {
    items: watch::Sender<Vec<Notification>>,
}

impl NotificationStore {
    #[must_use]
    pub fn new() -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self { items }
    }

    /// Snapshot of the held list, newest first.
    #[must_use]
    pub fn get_all(&self) -> Vec<Notification> {
        self.items.borrow().clone()
    }

    /// Applies one patch, fires the broadcast, and returns how many
    /// notifications actually changed. Re-applying a patch that has
    /// nothing left to do returns 0.
    pub fn apply_patch(&self, patch: NotificationPatch) -> usize {
        let mut modified = 0;

        self.items.send_modify(|items| match patch {
            NotificationPatch::Upsert(notification) => {
                items.retain(|held| held.id != notification.id);
                let position = items
                    .iter()
                    .position(|held| {
                        (held.created_at, held.id) < (notification.created_at, notification.id)
                    })
                    .unwrap_or(items.len());
                items.insert(position, notification);
                modified = 1;
            }
            NotificationPatch::MarkRead(id) => {
                if let Some(held) = items.iter_mut().find(|held| held.id == id && !held.read) {
                    held.read = true;
                    modified = 1;
                }
            }
            NotificationPatch::MarkAllRead => {
                for held in items.iter_mut().filter(|held| !held.read) {
                    held.read = true;
                    modified += 1;
                }
            }
            NotificationPatch::Remove(id) => {
                let before = items.len();
                items.retain(|held| held.id != id);
                modified = before - items.len();
            }
        });

        modified
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.items.subscribe()
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationPatch, NotificationStore};
    use crate::models::id::{NotificationId, UserId};
    use crate::models::{Notification, NotificationKind};
    use chrono::{Duration, Utc};

    fn notification(id: i64, minutes_ago: i64, read: bool) -> Notification {
        Notification {
            id: NotificationId(id),
            user_id: UserId(1),
            title: format!("Notification {id}"),
            message: "message".to_string(),
            kind: NotificationKind::System,
            read,
            created_at: Utc::now().naive_utc() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn keeps_newest_first_order() {
        let store = NotificationStore::new();
        store.apply_patch(NotificationPatch::Upsert(notification(1, 60, false)));
        store.apply_patch(NotificationPatch::Upsert(notification(2, 5, false)));
        store.apply_patch(NotificationPatch::Upsert(notification(3, 30, false)));

        let ids: Vec<i64> = store.get_all().iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn mark_all_read_is_idempotent() {
        let store = NotificationStore::new();
        store.apply_patch(NotificationPatch::Upsert(notification(1, 60, true)));
        store.apply_patch(NotificationPatch::Upsert(notification(2, 5, false)));

        assert_eq!(store.apply_patch(NotificationPatch::MarkAllRead), 1);
        assert_eq!(store.apply_patch(NotificationPatch::MarkAllRead), 0);
        assert!(store.get_all().iter().all(|n| n.read));
    }

    #[test]
    fn read_after_write_within_one_session() {
        let store = NotificationStore::new();
        store.apply_patch(NotificationPatch::Upsert(notification(1, 10, false)));

        assert_eq!(
            store.apply_patch(NotificationPatch::MarkRead(NotificationId(1))),
            1
        );
        assert!(store.get_all()[0].read);

        // Same patch again: nothing left to change.
        assert_eq!(
            store.apply_patch(NotificationPatch::MarkRead(NotificationId(1))),
            0
        );

        assert_eq!(
            store.apply_patch(NotificationPatch::Remove(NotificationId(1))),
            1
        );
        assert!(store.get_all().is_empty());
    }

    #[tokio::test]
    async fn broadcasts_every_patch() {
        let store = NotificationStore::new();
        let mut observer = store.subscribe();

        store.apply_patch(NotificationPatch::Upsert(notification(1, 10, false)));
        observer.changed().await.expect("sender alive");
        assert_eq!(observer.borrow().len(), 1);
    }
}
