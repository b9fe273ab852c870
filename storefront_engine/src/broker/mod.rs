//! The message broker abstraction.
//!
//! [`MessageBroker`] is the seam between the worker APIs and the transport. The production
//! implementation speaks AMQP and lives in the server crate; [`MemoryBroker`] here backs the test
//! suite and local development.
//!
//! Delivery semantics, common to every implementation:
//! * `publish` declares the queue durable, marks the message persistent, and returns only once the
//!   broker has confirmed receipt. There is no local buffering.
//! * `consume` declares each queue durable, limits in-flight deliveries to one per consumer, and
//!   dispatches each message to the handler. A handler `Ok` acknowledges the message (whether it
//!   was [`Disposition::Processed`] or deliberately [`Disposition::Dropped`]); a handler `Err`
//!   negative-acknowledges **without requeue**. One attempt per message: a poison message must
//!   never block the queue, at the cost of losing that event.

mod memory;

use std::{future::Future, pin::Pin, sync::Arc};

use storefront_common::Envelope;
use thiserror::Error;

pub use memory::MemoryBroker;

/// What the handler did with a message. Both outcomes acknowledge the delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The event was handled and its side effects are committed.
    Processed,
    /// The message was deliberately discarded (malformed, unrecognised event, or a preference
    /// gate decided no side effect applies).
    Dropped,
}

#[derive(Debug, Error)]
#[error("Message handler failed. {0}")]
pub struct HandlerError(pub String);

/// An async callback invoked once per delivery with the raw message body.
pub type MessageHandler =
    Arc<dyn Fn(Vec<u8>) -> Pin<Box<dyn Future<Output = Result<Disposition, HandlerError>> + Send>> + Send + Sync>;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Broker transport error. {0}")]
    Transport(String),
    #[error("Could not serialize the message payload. {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait MessageBroker: Clone + Send + Sync + 'static {
    /// Publishes the envelope to the named queue, returning once the broker has taken
    /// responsibility for the message.
    fn publish(&self, queue: &str, envelope: &Envelope) -> impl Future<Output = Result<(), BrokerError>> + Send;

    /// Consumes from the given queues until the underlying connection fails, dispatching every
    /// delivery to `handler`. Implementations interleave multiple queues; the caller controls
    /// nothing beyond the queue list. Callers are expected to loop and reconnect on error.
    fn consume(
        &self,
        queues: &[&str],
        handler: MessageHandler,
    ) -> impl Future<Output = Result<(), BrokerError>> + Send;
}

/// Wraps a `handle_message`-style API method into a [`MessageHandler`].
///
/// The closure owns a clone of the API, so the resulting handler is `'static` and can be handed
/// to a consumer task.
pub fn handler_fn<A, F, Fut, E>(api: A, f: F) -> MessageHandler
where
    A: Clone + Send + Sync + 'static,
    F: Fn(A, Vec<u8>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Disposition, E>> + Send + 'static,
    E: std::fmt::Display,
{
    Arc::new(move |body: Vec<u8>| {
        let fut = f(api.clone(), body);
        Box::pin(async move { fut.await.map_err(|e| HandlerError(e.to_string())) })
    })
}
