//! # Storefront services server
//!
//! The deployable binary for the storefront event pipeline. It is responsible for:
//! * Serving the REST API (orders, recommendations, notifications, health).
//! * Running the background workers: the order lifecycle ticker, the recommendation sweep, and
//!   the queue consumers that materialize recommendations and notifications.
//! * Talking to the outside world: RabbitMQ for events and the external user service for
//!   preference lookups.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.

pub mod amqp;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
pub mod users;
pub mod workers;

#[cfg(test)]
mod endpoint_tests;
