use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker I/O error: {0}")]
    Io(String),
}

/// Opaque delivery tag identifying one unsettled broker delivery. `spec.md`
/// §4.F: acknowledgement and republish happen on the same channel as the
/// original delivery, so the tag is scoped to whichever channel produced
/// it — callers never compare tags across channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeliveryTag(pub u64);

/// One undecoded message as it arrives off a queue, with its `mb-retries`
/// header already parsed (`spec.md` §6: "mb-retries (integer, decremented
/// per failure)").
#[derive(Debug, Clone)]
pub struct Delivery {
    pub tag: DeliveryTag,
    pub routing_key: String,
    pub body: Vec<u8>,
    pub retries: Option<u32>,
}

/// The message-broker boundary (`spec.md` §1: out of scope as an external
/// collaborator; §4.F/§6 fix its exact protocol). `mbsearch-indexer` wires
/// this to a real AMQP 0-9-1 connection via `lapin`; this crate only
/// depends on the trait so the retry/dead-letter state machine is
/// testable without a running broker.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Settle a delivery as successfully processed (`basic_ack`).
    async fn ack(&self, tag: DeliveryTag) -> Result<(), BrokerError>;

    /// Reject a delivery without requeueing it (`basic_reject(requeue =
    /// false)`) — `spec.md` §4.F step 5: "basic_ack is never called on the
    /// failure path".
    async fn reject(&self, tag: DeliveryTag) -> Result<(), BrokerError>;

    /// Republish `body` to `exchange` with `routing_key`, carrying
    /// `retries` as the new `mb-retries` header value (`spec.md` §4.F
    /// steps 4b-4d).
    async fn republish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: Vec<u8>,
        retries: u32,
    ) -> Result<(), BrokerError>;
}
