use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------  OrderStatusType  -----------------------------------------------------------

/// The lifecycle state of an order. Transitions only run forward, one step at a time:
/// `Placed → Shipped → Delivered`. `Delivered` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    Placed,
    Shipped,
    Delivered,
}

impl OrderStatusType {
    /// The next state in the lifecycle, or `None` once the order has been delivered.
    pub fn next(self) -> Option<Self> {
        match self {
            OrderStatusType::Placed => Some(OrderStatusType::Shipped),
            OrderStatusType::Shipped => Some(OrderStatusType::Delivered),
            OrderStatusType::Delivered => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatusType::Delivered
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Placed => write!(f, "placed"),
            OrderStatusType::Shipped => write!(f, "shipped"),
            OrderStatusType::Delivered => write!(f, "delivered"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placed" => Ok(Self::Placed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------      Order       ------------------------------------------------------------

/// An order row. On the wire this is exactly `{id, userId, status}`: the timestamps are
/// internal bookkeeping, and REST consumers reject fields they do not know about.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatusType,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
}

impl NewOrder {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}

//--------------------------------------  Recommendation  ------------------------------------------------------------

/// A persisted product recommendation. Immutable once created. `reason` is free text, not a
/// structured link to the order that triggered it. Serializes as
/// `{id, userId, productId, reason}`; the timestamp stays internal.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub reason: String,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRecommendation {
    pub user_id: i64,
    pub product_id: i64,
    pub reason: String,
}

//--------------------------------------  NotificationType  ----------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Recommendation,
    OrderUpdate,
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Recommendation => write!(f, "recommendation"),
            NotificationType::OrderUpdate => write!(f, "order_update"),
        }
    }
}

//--------------------------------------   Notification   ------------------------------------------------------------

/// A user-visible notification materialized from a queue event. After creation, only the `read`
/// flag ever changes, and only from `false` to `true`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub kind: NotificationType,
    pub content: String,
}
