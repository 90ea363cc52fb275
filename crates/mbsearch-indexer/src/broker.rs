use lapin::options::{BasicAckOptions, BasicPublishOptions, BasicRejectOptions};
use lapin::types::{AMQPValue, FieldTable};
use lapin::{BasicProperties, Channel};

use async_trait::async_trait;
use mbsearch_consumer::{Broker, BrokerError, DeliveryTag};

/// AMQP 0-9-1 header carrying the retry budget (`spec.md` §6).
pub const RETRIES_HEADER: &str = "mb-retries";

/// The concrete [`Broker`] this daemon runs against: one `lapin::Channel`
/// per worker (`spec.md` §5: "Each worker owns its own database session"
/// applies equally to its broker channel — channels are not shared across
/// tokio tasks). Acknowledgement and republish always go out on the same
/// channel the delivery arrived on (`spec.md` §4.F step 5).
pub struct LapinBroker {
    channel: Channel,
}

impl LapinBroker {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl Broker for LapinBroker {
    async fn ack(&self, tag: DeliveryTag) -> Result<(), BrokerError> {
        self.channel
            .basic_ack(tag.0, BasicAckOptions::default())
            .await
            .map_err(|e| BrokerError::Io(e.to_string()))
    }

    async fn reject(&self, tag: DeliveryTag) -> Result<(), BrokerError> {
        self.channel
            .basic_reject(tag.0, BasicRejectOptions { requeue: false })
            .await
            .map_err(|e| BrokerError::Io(e.to_string()))
    }

    async fn republish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: Vec<u8>,
        retries: u32,
    ) -> Result<(), BrokerError> {
        let mut headers = FieldTable::default();
        headers.insert(RETRIES_HEADER.into(), AMQPValue::LongUInt(retries));
        let properties = BasicProperties::default().with_headers(headers);

        self.channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                &body,
                properties,
            )
            .await
            .map_err(|e| BrokerError::Io(e.to_string()))?
            .await
            .map_err(|e| BrokerError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Parses the `mb-retries` header off a delivery's properties (`spec.md`
/// §4.F step 1: "Read mb-retries from message headers; if absent,
/// initialize to a configured default").
pub fn retries_from_headers(headers: Option<&FieldTable>) -> Option<u32> {
    let table = headers?;
    match table.inner().get(RETRIES_HEADER)? {
        AMQPValue::LongUInt(n) => Some(*n),
        AMQPValue::LongLongInt(n) => u32::try_from(*n).ok(),
        AMQPValue::ShortInt(n) => u32::try_from(*n).ok(),
        AMQPValue::LongInt(n) => u32::try_from(*n).ok(),
        _ => None,
    }
}
