use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewNotification, Notification},
    traits::StorageError,
};

pub async fn insert_notification(
    notification: NewNotification,
    conn: &mut SqliteConnection,
) -> Result<Notification, StorageError> {
    let notification: Notification = sqlx::query_as(
        r#"
            INSERT INTO notifications (user_id, kind, content) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(notification.user_id)
    .bind(notification.kind)
    .bind(notification.content)
    .fetch_one(conn)
    .await?;
    trace!("📝️ Notification {} inserted for user {}", notification.id, notification.user_id);
    Ok(notification)
}

/// Unread notifications for the user, in insertion order.
pub async fn fetch_unread_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Notification>, StorageError> {
    let notifications =
        sqlx::query_as("SELECT * FROM notifications WHERE user_id = $1 AND read = 0 ORDER BY id ASC")
            .bind(user_id)
            .fetch_all(conn)
            .await?;
    Ok(notifications)
}

/// Sets `read = true`, returning the updated row, or `None` if the id is unknown. Calling this on
/// an already-read notification is a harmless no-op mutation.
pub(crate) async fn mark_notification_read(
    id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Notification>, StorageError> {
    let result: Option<Notification> =
        sqlx::query_as("UPDATE notifications SET read = 1 WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(conn)
            .await?;
    Ok(result)
}
