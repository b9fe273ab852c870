use serde::{Deserialize, Serialize};

/// Queue carrying `ORDER_PLACED` events from the order service to the recommendation worker.
pub const ORDER_PLACED_QUEUE: &str = "order_placed_queue";
/// Queue carrying `ORDER_STATUS_UPDATE` events from the order service to the notification worker.
pub const ORDER_UPDATES_QUEUE: &str = "order_updates_queue";
/// Queue carrying `NEW_RECOMMENDATION` events from the recommendation worker to the notification worker.
pub const RECOMMENDATIONS_QUEUE: &str = "recommendations_queue";

/// The event envelope carried on every queue message.
///
/// Serialises as `{"event": "<NAME>", "data": {...}}`. An unrecognised `event` value fails
/// deserialization; consumers treat that the same way as any other malformed body (log and
/// acknowledge, never redeliver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum Envelope {
    #[serde(rename = "ORDER_PLACED")]
    OrderPlaced(OrderPlacedData),
    #[serde(rename = "ORDER_STATUS_UPDATE")]
    OrderStatusUpdate(OrderStatusUpdateData),
    #[serde(rename = "NEW_RECOMMENDATION")]
    NewRecommendation(NewRecommendationData),
}

impl Envelope {
    /// The queue this event is conventionally published to.
    pub fn queue(&self) -> &'static str {
        match self {
            Envelope::OrderPlaced(_) => ORDER_PLACED_QUEUE,
            Envelope::OrderStatusUpdate(_) => ORDER_UPDATES_QUEUE,
            Envelope::NewRecommendation(_) => RECOMMENDATIONS_QUEUE,
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Envelope::OrderPlaced(_) => "ORDER_PLACED",
            Envelope::OrderStatusUpdate(_) => "ORDER_STATUS_UPDATE",
            Envelope::NewRecommendation(_) => "NEW_RECOMMENDATION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedData {
    pub order_id: i64,
    pub user_id: i64,
    /// Lowercase status string, `placed` at the time of this event.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdateData {
    pub user_id: i64,
    pub status: String,
    pub order_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendationData {
    pub user_id: i64,
    /// Human-readable, pre-composed string. The notification worker stores this verbatim and
    /// never sees the structured recommendation fields.
    pub content: String,
}
