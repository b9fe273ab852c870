use crate::{
    db_types::{NewNotification, Notification},
    traits::StorageError,
};

/// Storage behaviour required by the notification worker.
#[allow(async_fn_in_trait)]
pub trait NotificationManagement: Clone {
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, StorageError>;

    /// Unread notifications for the user, in insertion order.
    async fn fetch_unread_for_user(&self, user_id: i64) -> Result<Vec<Notification>, StorageError>;

    /// Sets `read = true` on the notification and returns the updated record. A second call on
    /// the same id is a no-op mutation, not an error. Returns `Ok(None)` when the id is unknown.
    async fn mark_notification_read(&self, id: i64) -> Result<Option<Notification>, StorageError>;
}
