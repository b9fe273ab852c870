use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType},
    traits::StorageError,
};

/// Inserts a new order with status `placed` using the given connection. This is not atomic on its
/// own; embed the call inside a transaction if you need atomicity with other writes, passing
/// `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, StorageError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (user_id, status) VALUES ($1, $2)
            RETURNING *;
        "#,
    )
    .bind(order.user_id)
    .bind(OrderStatusType::Placed)
    .fetch_one(conn)
    .await?;
    trace!("📝️ Order {} inserted for user {}", order.id, order.user_id);
    Ok(order)
}

/// All orders for the user, oldest first.
pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, StorageError> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY id ASC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Every order not yet in the terminal `delivered` state, oldest first.
pub async fn fetch_undelivered_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, StorageError> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE status <> $1 ORDER BY id ASC")
        .bind(OrderStatusType::Delivered)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

pub(crate) async fn update_order_status(
    id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Order, StorageError> {
    let result: Option<Order> =
        sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(conn)
            .await?;
    result.ok_or(StorageError::OrderNotFound(id))
}
