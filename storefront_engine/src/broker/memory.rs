//! An in-process broker with the same delivery semantics as the AMQP implementation.
//!
//! Used by the test suite and for running the pipeline locally without a broker. Messages live in
//! per-queue FIFO buffers; a consumer processes one message at a time across its queues, acking on
//! handler success and dropping (nack, no requeue) on handler failure. The broker also keeps a log
//! of every successfully published envelope so tests can assert on publish behaviour, and can be
//! told to fail publishes to a given queue to simulate an outage.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
};

use log::*;
use storefront_common::Envelope;
use tokio::sync::Notify;

use crate::broker::{BrokerError, MessageBroker, MessageHandler};

#[derive(Default)]
struct Inner {
    queues: HashMap<String, VecDeque<Vec<u8>>>,
    published: Vec<(String, Envelope)>,
    failing: HashSet<String>,
}

#[derive(Clone, Default)]
pub struct MemoryBroker {
    inner: Arc<Mutex<Inner>>,
    wakeup: Arc<Notify>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every envelope successfully published so far, in publish order, with its queue name.
    pub fn published(&self) -> Vec<(String, Envelope)> {
        self.inner.lock().unwrap().published.clone()
    }

    /// Envelopes published to a single queue.
    pub fn published_to(&self, queue: &str) -> Vec<Envelope> {
        self.inner
            .lock()
            .unwrap()
            .published
            .iter()
            .filter(|(q, _)| q == queue)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Number of messages currently waiting on the queue.
    pub fn queue_len(&self, queue: &str) -> usize {
        self.inner.lock().unwrap().queues.get(queue).map(VecDeque::len).unwrap_or(0)
    }

    /// Makes every subsequent publish to `queue` fail with a transport error.
    pub fn fail_publishes_to(&self, queue: &str) {
        self.inner.lock().unwrap().failing.insert(queue.to_string());
    }

    /// Clears a failure injected with [`Self::fail_publishes_to`].
    pub fn restore_queue(&self, queue: &str) {
        self.inner.lock().unwrap().failing.remove(queue);
    }

    /// Enqueues an arbitrary byte payload, bypassing envelope serialization. Tests use this to
    /// deliver malformed bodies to a consumer.
    pub fn push_raw(&self, queue: &str, body: Vec<u8>) {
        let mut inner = self.inner.lock().unwrap();
        inner.queues.entry(queue.to_string()).or_default().push_back(body);
        drop(inner);
        self.wakeup.notify_one();
    }

    fn pop_any(&self, queues: &[&str]) -> Option<(String, Vec<u8>)> {
        let mut inner = self.inner.lock().unwrap();
        for queue in queues {
            if let Some(buffer) = inner.queues.get_mut(*queue) {
                if let Some(body) = buffer.pop_front() {
                    return Some((queue.to_string(), body));
                }
            }
        }
        None
    }
}

impl MessageBroker for MemoryBroker {
    async fn publish(&self, queue: &str, envelope: &Envelope) -> Result<(), BrokerError> {
        let body = serde_json::to_vec(envelope)?;
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.failing.contains(queue) {
                return Err(BrokerError::Transport(format!("simulated outage on queue {queue}")));
            }
            inner.queues.entry(queue.to_string()).or_default().push_back(body);
            inner.published.push((queue.to_string(), envelope.clone()));
        }
        self.wakeup.notify_one();
        trace!("📬️ Published {} to {queue}", envelope.event_name());
        Ok(())
    }

    async fn consume(&self, queues: &[&str], handler: MessageHandler) -> Result<(), BrokerError> {
        debug!("📬️ In-memory consumer started on {}", queues.join(", "));
        loop {
            let (queue, body) = loop {
                if let Some(delivery) = self.pop_any(queues) {
                    break delivery;
                }
                self.wakeup.notified().await;
            };
            // One in-flight message at a time: the next pop happens only after the handler
            // resolves, mirroring prefetch=1 on the AMQP side.
            match handler(body).await {
                Ok(disposition) => trace!("📬️ Message from {queue} acked ({disposition:?})"),
                Err(e) => warn!("📬️ Message from {queue} dropped without requeue. {e}"),
            }
        }
    }
}
