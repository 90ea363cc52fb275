use std::sync::Mutex;

use async_trait::async_trait;

use crate::broker::{Broker, BrokerError, DeliveryTag};

/// In-memory [`Broker`] recording every call it receives, for testing the
/// retry/dead-letter state machine in [`crate::protocol`] without a
/// running AMQP broker.
#[derive(Default)]
pub struct FakeBroker {
    acked: Mutex<Vec<DeliveryTag>>,
    rejected: Mutex<Vec<DeliveryTag>>,
    republished: Mutex<Vec<(String, String, u32)>>,
}

impl FakeBroker {
    pub fn acked(&self) -> Vec<DeliveryTag> {
        self.acked.lock().unwrap().clone()
    }

    pub fn rejected(&self) -> Vec<DeliveryTag> {
        self.rejected.lock().unwrap().clone()
    }

    /// `(exchange, routing_key, retries)` for every republish, in call
    /// order.
    pub fn republished(&self) -> Vec<(String, String, u32)> {
        self.republished.lock().unwrap().clone()
    }
}

#[async_trait]
impl Broker for FakeBroker {
    async fn ack(&self, tag: DeliveryTag) -> Result<(), BrokerError> {
        self.acked.lock().unwrap().push(tag);
        Ok(())
    }

    async fn reject(&self, tag: DeliveryTag) -> Result<(), BrokerError> {
        self.rejected.lock().unwrap().push(tag);
        Ok(())
    }

    async fn republish(
        &self,
        exchange: &str,
        routing_key: &str,
        _body: Vec<u8>,
        retries: u32,
    ) -> Result<(), BrokerError> {
        self.republished
            .lock()
            .unwrap()
            .push((exchange.to_string(), routing_key.to_string(), retries));
        Ok(())
    }
}
