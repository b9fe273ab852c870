use std::fmt::Debug;

use log::*;
use storefront_common::{Envelope, OrderPlacedData, OrderStatusUpdateData, ORDER_PLACED_QUEUE, ORDER_UPDATES_QUEUE};

use crate::{
    api::OrderFlowError,
    broker::MessageBroker,
    db_types::{NewOrder, Order},
    traits::OrderManagement,
};

/// `OrderLifecycleApi` owns order records and their forward-only status progression. It emits
/// `ORDER_PLACED` on creation and `ORDER_STATUS_UPDATE` on every ticker-driven transition.
pub struct OrderLifecycleApi<D, B> {
    db: D,
    broker: B,
}

impl<D, B> Debug for OrderLifecycleApi<D, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderLifecycleApi")
    }
}

impl<D: Clone, B: Clone> Clone for OrderLifecycleApi<D, B> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone(), broker: self.broker.clone() }
    }
}

impl<D, B> OrderLifecycleApi<D, B> {
    pub fn new(db: D, broker: B) -> Self {
        Self { db, broker }
    }
}

/// Summary of a single lifecycle tick.
#[derive(Debug, Clone, Default)]
pub struct AdvanceResult {
    /// Orders whose status transition was committed this tick.
    pub advanced: Vec<Order>,
    /// Transitions that committed but whose `ORDER_STATUS_UPDATE` publish failed. The rows keep
    /// their new status; the event is lost.
    pub publish_failures: usize,
    /// Orders whose status update itself failed. Their state is unchanged; the next tick will
    /// retry them.
    pub update_failures: usize,
}

impl AdvanceResult {
    pub fn advanced_count(&self) -> usize {
        self.advanced.len()
    }

    pub fn published_count(&self) -> usize {
        self.advanced.len() - self.publish_failures
    }
}

impl<D, B> OrderLifecycleApi<D, B>
where
    D: OrderManagement,
    B: MessageBroker,
{
    /// Creates a new order for the user with status `placed` and publishes `ORDER_PLACED`.
    ///
    /// The database commit happens-before the publish. If the publish fails, the order row
    /// remains (there is no compensating rollback) and the error propagates to the caller.
    /// The caller is trusted to supply a valid user id; no existence check is made here.
    pub async fn place_order(&self, user_id: i64) -> Result<Order, OrderFlowError> {
        let order = self.db.insert_order(NewOrder::new(user_id)).await?;
        debug!("🔄️📦️ Order {} placed for user {}", order.id, order.user_id);
        let envelope = Envelope::OrderPlaced(OrderPlacedData {
            order_id: order.id,
            user_id: order.user_id,
            status: order.status.to_string(),
        });
        self.broker.publish(ORDER_PLACED_QUEUE, &envelope).await?;
        trace!("🔄️📦️ ORDER_PLACED published for order {}", order.id);
        Ok(order)
    }

    /// Pure read; no side effects.
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderFlowError> {
        let orders = self.db.fetch_orders_for_user(user_id).await?;
        Ok(orders)
    }

    /// Advances every non-delivered order one step along `placed → shipped → delivered`,
    /// committing each transition individually and publishing `ORDER_STATUS_UPDATE` per order.
    ///
    /// Failures are contained per order: one order's failed update or publish is logged and
    /// counted, and the batch continues with the remaining orders. Callers must not run two
    /// invocations concurrently; the ticker in the server crate guarantees single-flight by
    /// awaiting each run before the next tick.
    pub async fn advance_all_orders(&self) -> Result<AdvanceResult, OrderFlowError> {
        let orders = self.db.fetch_undelivered_orders().await?;
        trace!("🔄️📦️ {} orders due for a status transition", orders.len());
        let mut result = AdvanceResult::default();
        for order in orders {
            // fetch_undelivered_orders already excludes terminal orders; the guard also protects
            // against a concurrent placement racing the fetch.
            let Some(next) = order.status.next() else {
                continue;
            };
            let previous = order.status;
            let updated = match self.db.update_order_status(order.id, next).await {
                Ok(updated) => updated,
                Err(e) => {
                    error!("🔄️📦️ Could not advance order {} from {previous}: {e}", order.id);
                    result.update_failures += 1;
                    continue;
                },
            };
            debug!("🔄️📦️ Order {} status updated from {previous} to {}", updated.id, updated.status);
            let envelope = Envelope::OrderStatusUpdate(OrderStatusUpdateData {
                user_id: updated.user_id,
                status: updated.status.to_string(),
                order_id: updated.id,
            });
            if let Err(e) = self.broker.publish(ORDER_UPDATES_QUEUE, &envelope).await {
                error!("🔄️📦️ Could not publish ORDER_STATUS_UPDATE for order {}. {e}", updated.id);
                result.publish_failures += 1;
            }
            result.advanced.push(updated);
        }
        Ok(result)
    }
}
