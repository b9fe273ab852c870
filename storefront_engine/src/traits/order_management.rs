use crate::{
    db_types::{NewOrder, Order, OrderStatusType},
    traits::StorageError,
};

/// Storage behaviour required by the order lifecycle manager.
///
/// Orders are owned exclusively by this side of the system; other workers only ever read them
/// over REST.
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    /// Inserts a new order with status `placed` and returns the stored record.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StorageError>;

    /// All orders belonging to the given user, in creation order.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StorageError>;

    /// Every order that has not yet reached the terminal `delivered` state.
    async fn fetch_undelivered_orders(&self) -> Result<Vec<Order>, StorageError>;

    /// Sets the status of a single order, committing the change before returning.
    /// Fails with [`StorageError::OrderNotFound`] if the id is unknown.
    async fn update_order_status(&self, id: i64, status: OrderStatusType) -> Result<Order, StorageError>;
}
