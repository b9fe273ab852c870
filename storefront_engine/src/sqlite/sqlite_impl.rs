//! `SqliteDatabase` is the concrete storage backend for the storefront pipeline.
//!
//! It implements all the storage traits defined in the [`crate::traits`] module over a shared
//! connection pool. The pool is the single point of serialization for the pipeline: HTTP handlers
//! and queue consumers share it, and there is no application-level locking beyond it.

use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{new_pool, notifications, orders, recommendations};
use crate::{
    db_types::{NewNotification, NewOrder, NewRecommendation, Notification, Order, OrderStatusType, Recommendation},
    traits::{NotificationManagement, OrderManagement, RecommendationManagement, StorageError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any outstanding embedded migrations.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.into()))?;
        info!("🗃️ Migrations complete");
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::insert_order(order, &mut conn).await?;
        debug!("🗃️ Order {} has been saved in the DB", order.id);
        Ok(order)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_user(user_id, &mut conn).await
    }

    async fn fetch_undelivered_orders(&self) -> Result<Vec<Order>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_undelivered_orders(&mut conn).await
    }

    async fn update_order_status(&self, id: i64, status: OrderStatusType) -> Result<Order, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_order_status(id, status, &mut conn).await?;
        debug!("🗃️ Order {} is now {}", order.id, order.status);
        Ok(order)
    }
}

impl RecommendationManagement for SqliteDatabase {
    async fn insert_recommendation(&self, rec: NewRecommendation) -> Result<Recommendation, StorageError> {
        let mut conn = self.pool.acquire().await?;
        recommendations::insert_recommendation(rec, &mut conn).await
    }

    async fn fetch_recommendations_for_user(&self, user_id: i64) -> Result<Vec<Recommendation>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        recommendations::fetch_recommendations_for_user(user_id, &mut conn).await
    }
}

impl NotificationManagement for SqliteDatabase {
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, StorageError> {
        let mut conn = self.pool.acquire().await?;
        notifications::insert_notification(notification, &mut conn).await
    }

    async fn fetch_unread_for_user(&self, user_id: i64) -> Result<Vec<Notification>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        notifications::fetch_unread_for_user(user_id, &mut conn).await
    }

    async fn mark_notification_read(&self, id: i64) -> Result<Option<Notification>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        notifications::mark_notification_read(id, &mut conn).await
    }
}
