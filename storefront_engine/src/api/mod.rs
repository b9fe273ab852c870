//! The worker APIs: the public-facing functionality of the event pipeline.
//!
//! Each API is generic over its storage trait and (where it publishes) over the
//! [`crate::broker::MessageBroker`], so the same logic is exercised by the AMQP transport in
//! production and the in-process broker in tests.

mod errors;
mod notifications;
mod order_lifecycle;
mod recommendations;

pub use errors::{NotificationError, OrderFlowError, RecommendationError};
pub use notifications::{order_update_content, NotificationApi};
pub use order_lifecycle::{AdvanceResult, OrderLifecycleApi};
pub use recommendations::{recommendation_content, RecommendationApi, SweepResult, RECOMMENDATION_REASON};
