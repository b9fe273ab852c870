use thiserror::Error;

use crate::{
    broker::BrokerError,
    traits::{StorageError, UserDirectoryError},
};

#[derive(Debug, Error)]
pub enum OrderFlowError {
    #[error("Order storage error. {0}")]
    StorageError(#[from] StorageError),
    #[error("Could not publish the order event. {0}")]
    PublishError(#[from] BrokerError),
}

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("Recommendation storage error. {0}")]
    StorageError(#[from] StorageError),
    #[error("Could not publish the recommendation event. {0}")]
    PublishError(#[from] BrokerError),
    #[error("User directory error. {0}")]
    UserDirectoryError(#[from] UserDirectoryError),
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification storage error. {0}")]
    StorageError(#[from] StorageError),
    #[error("Notification {0} not found")]
    NotFound(i64),
}
