//! Storefront Event Pipeline Engine
//!
//! This library contains the core logic for the storefront's asynchronous event pipeline:
//! order placement publishes an event, a recommendation worker consumes it and may publish a new
//! event, and a notification worker consumes both recommendation and order-update events to
//! materialize user-visible notifications.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should
//!    never need to access the database directly; use the worker APIs instead. The exception is the
//!    data types used in the database, defined in [`mod@db_types`], which are public.
//! 2. Storage and collaborator traits ([`mod@traits`]). Specific backends (and test doubles) need
//!    to implement these in order to drive the worker APIs.
//! 3. The worker APIs ([`mod@api`]): order lifecycle management, recommendation generation, and
//!    notification materialization. Each is generic over its storage backend and over the message
//!    broker ([`broker::MessageBroker`]), so the same code runs against AMQP in production and the
//!    in-process [`broker::MemoryBroker`] in tests.

pub mod api;
pub mod broker;
pub mod catalog;
pub mod db_types;
mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{
    AdvanceResult,
    NotificationApi,
    NotificationError,
    OrderFlowError,
    OrderLifecycleApi,
    RecommendationApi,
    RecommendationError,
    SweepResult,
    RECOMMENDATION_REASON,
};
pub use sqlite::SqliteDatabase;
