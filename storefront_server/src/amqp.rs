//! The RabbitMQ implementation of the broker trait.
//!
//! Publishes open a fresh connection per call and enable publisher confirms, so a successful
//! `publish` means the broker has taken responsibility for a persistent copy of the message.
//! Consumers hold a long-lived channel with a prefetch of one, acking after the handler returns
//! and nacking without requeue when it fails.

use futures::{stream::select_all, StreamExt};
use lapin::{
    options::{
        BasicAckOptions,
        BasicConsumeOptions,
        BasicNackOptions,
        BasicPublishOptions,
        BasicQosOptions,
        ConfirmSelectOptions,
        QueueDeclareOptions,
    },
    publisher_confirm::Confirmation,
    types::FieldTable,
    BasicProperties,
    Channel,
    Connection,
    ConnectionProperties,
};
use log::*;
use storefront_common::Envelope;
use storefront_engine::broker::{BrokerError, MessageBroker, MessageHandler};

use crate::config::AmqpConfig;

const PERSISTENT_DELIVERY_MODE: u8 = 2;

#[derive(Clone)]
pub struct AmqpBroker {
    config: AmqpConfig,
}

impl AmqpBroker {
    pub fn new(config: AmqpConfig) -> Self {
        Self { config }
    }

    async fn open_channel(&self) -> Result<Channel, BrokerError> {
        let connection = Connection::connect(&self.config.url(), ConnectionProperties::default())
            .await
            .map_err(transport)?;
        connection.create_channel().await.map_err(transport)
    }

    /// Queues are declared durable by whichever side touches them first, so neither the producer
    /// nor the consumers care about start order.
    async fn declare_durable(channel: &Channel, queue: &str) -> Result<(), BrokerError> {
        let options = QueueDeclareOptions { durable: true, ..QueueDeclareOptions::default() };
        channel.queue_declare(queue, options, FieldTable::default()).await.map_err(transport)?;
        Ok(())
    }
}

fn transport(e: lapin::Error) -> BrokerError {
    BrokerError::Transport(e.to_string())
}

impl MessageBroker for AmqpBroker {
    async fn publish(&self, queue: &str, envelope: &Envelope) -> Result<(), BrokerError> {
        let body = serde_json::to_vec(envelope)?;
        let channel = self.open_channel().await?;
        channel.confirm_select(ConfirmSelectOptions::default()).await.map_err(transport)?;
        Self::declare_durable(&channel, queue).await?;
        let properties = BasicProperties::default().with_delivery_mode(PERSISTENT_DELIVERY_MODE);
        let confirmation = channel
            .basic_publish("", queue, BasicPublishOptions::default(), &body, properties)
            .await
            .map_err(transport)?
            .await
            .map_err(transport)?;
        if let Confirmation::Nack(_) = confirmation {
            return Err(BrokerError::Transport(format!("The broker refused a message for {queue}")));
        }
        trace!("📬️ Published {} to {queue}", envelope.event_name());
        Ok(())
    }

    async fn consume(&self, queues: &[&str], handler: MessageHandler) -> Result<(), BrokerError> {
        let channel = self.open_channel().await?;
        channel.basic_qos(1, BasicQosOptions::default()).await.map_err(transport)?;
        let mut consumers = Vec::with_capacity(queues.len());
        for queue in queues {
            Self::declare_durable(&channel, queue).await?;
            let consumer = channel
                .basic_consume(queue, &format!("sfs-{queue}"), BasicConsumeOptions::default(), FieldTable::default())
                .await
                .map_err(transport)?;
            consumers.push(consumer);
        }
        info!("📬️ Consuming from {}", queues.join(", "));
        let mut deliveries = select_all(consumers);
        while let Some(delivery) = deliveries.next().await {
            let delivery = delivery.map_err(transport)?;
            match handler(delivery.data.clone()).await {
                Ok(_) => delivery.ack(BasicAckOptions::default()).await.map_err(transport)?,
                Err(e) => {
                    warn!("📬️ A message handler failed. Discarding the message without requeue. {e}");
                    let options = BasicNackOptions { requeue: false, ..BasicNackOptions::default() };
                    delivery.nack(options).await.map_err(transport)?;
                },
            }
        }
        Err(BrokerError::Transport("The broker closed the consumer stream".to_string()))
    }
}
