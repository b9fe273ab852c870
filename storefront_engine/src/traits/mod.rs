//! Traits at the seams of the pipeline.
//!
//! Storage traits are implemented by [`crate::SqliteDatabase`]; the worker APIs are generic over
//! them so that tests can substitute doubles. [`UserDirectory`] abstracts the external user
//! service, which the recommendation worker consults for preference flags.

mod notification_management;
mod order_management;
mod recommendation_management;
mod user_directory;

use thiserror::Error;

pub use notification_management::NotificationManagement;
pub use order_management::OrderManagement;
pub use recommendation_management::RecommendationManagement;
pub use user_directory::{UserDirectory, UserDirectoryError};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Order id {0} does not exist")]
    OrderNotFound(i64),
}
