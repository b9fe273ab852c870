use std::fmt::Debug;

use log::*;
use storefront_common::Envelope;

use crate::{
    api::NotificationError,
    broker::Disposition,
    db_types::{NewNotification, Notification, NotificationType},
    traits::NotificationManagement,
};

/// The server-composed content for order-update notifications. The status text from the event is
/// embedded, never taken verbatim as the whole message.
pub fn order_update_content(order_id: i64, status: &str) -> String {
    format!("Your order {order_id} status has been updated to {status}.")
}

/// `NotificationApi` materializes user-visible notifications from `NEW_RECOMMENDATION` and
/// `ORDER_STATUS_UPDATE` events, and exposes the read/unread surface.
pub struct NotificationApi<D> {
    db: D,
}

impl<D> Debug for NotificationApi<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi")
    }
}

impl<D: Clone> Clone for NotificationApi<D> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<D> NotificationApi<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }
}

impl<D> NotificationApi<D>
where D: NotificationManagement
{
    /// The shared consumer entry point for both the recommendations and order-updates queues,
    /// keyed by the envelope's event. Unrecognised events and malformed bodies are logged and
    /// dropped (acknowledged); only a persistence failure propagates, causing a
    /// nack-without-requeue.
    pub async fn handle_message(&self, body: &[u8]) -> Result<Disposition, NotificationError> {
        let envelope = match serde_json::from_slice::<Envelope>(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("🔔️ Dropping malformed message. {e}");
                return Ok(Disposition::Dropped);
            },
        };
        let notification = match envelope {
            Envelope::NewRecommendation(data) => NewNotification {
                user_id: data.user_id,
                kind: NotificationType::Recommendation,
                content: data.content,
            },
            Envelope::OrderStatusUpdate(data) => NewNotification {
                user_id: data.user_id,
                kind: NotificationType::OrderUpdate,
                content: order_update_content(data.order_id, &data.status),
            },
            other => {
                warn!("🔔️ Unhandled event: {}", other.event_name());
                return Ok(Disposition::Dropped);
            },
        };
        let stored = self.db.insert_notification(notification).await?;
        debug!("🔔️ Created {} notification {} for user {}", stored.kind, stored.id, stored.user_id);
        Ok(Disposition::Processed)
    }

    /// Idempotently marks the notification as read. Fails with
    /// [`NotificationError::NotFound`] when the id is unknown; a repeated call on a
    /// notification that is already read succeeds and changes nothing.
    pub async fn mark_read(&self, id: i64) -> Result<Notification, NotificationError> {
        let notification = self.db.mark_notification_read(id).await?.ok_or(NotificationError::NotFound(id))?;
        trace!("🔔️ Notification {id} marked as read");
        Ok(notification)
    }

    /// Unread notifications for the user, in insertion order.
    pub async fn unread_for_user(&self, user_id: i64) -> Result<Vec<Notification>, NotificationError> {
        let notifications = self.db.fetch_unread_for_user(user_id).await?;
        Ok(notifications)
    }
}
