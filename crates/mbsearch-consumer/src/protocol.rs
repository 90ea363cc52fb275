use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::broker::{Broker, BrokerError, Delivery};
use crate::message::{QueueKind, WireMessage};
use crate::outcome::Outcome;

/// Queue/exchange names and the default retry budget (`spec.md` §6):
/// normal deliveries route on `search.index`/`search.delete`; retries
/// publish to `search.retry`; terminal failures to `search.failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub retry_exchange: String,
    pub failed_exchange: String,
    pub default_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_exchange: "search.retry".to_string(),
            failed_exchange: "search.failed".to_string(),
            default_retries: crate::DEFAULT_RETRY_BUDGET,
        }
    }
}

/// The wrapped handler a queue's deliveries are dispatched to: component E
/// for index/retry, a direct-delete path for delete (`spec.md` §4.F step
/// 2). Implementations live in `mbsearch-core`/`mbsearch-indexer`, wiring
/// this trait to the real router/materializer/dispatcher chain; this crate
/// only depends on the trait boundary so the ack/retry state machine below
/// is testable without any of that machinery.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, message: WireMessage, queue: QueueKind) -> Outcome;
}

/// Decodes one delivery's body, invokes the wrapped handler, and settles
/// the delivery on the same channel it arrived on (`spec.md` §4.F: "every
/// delivery ends in exactly one of basic_ack ... or basic_reject ...
/// + basic_publish. No path leaves a delivery unsettled").
pub async fn process_delivery<B: Broker + ?Sized, H: Handler + ?Sized>(
    broker: &B,
    handler: &H,
    policy: &RetryPolicy,
    queue: QueueKind,
    delivery: Delivery,
) -> Result<(), BrokerError> {
    let outcome = match serde_json::from_slice::<WireMessage>(&delivery.body) {
        Ok(message) => handler.handle(message, queue).await,
        Err(err) => {
            tracing::warn!(error = %err, "message body failed to decode");
            Outcome::Permanent(crate::outcome::HandlerError::from(err))
        }
    };
    settle(broker, policy, &delivery, outcome).await
}

/// The settlement half of `spec.md` §4.F step 3-5, split out from
/// [`process_delivery`] so tests can drive it directly against a known
/// [`Outcome`] without round-tripping a JSON body.
pub async fn settle<B: Broker + ?Sized>(
    broker: &B,
    policy: &RetryPolicy,
    delivery: &Delivery,
    outcome: Outcome,
) -> Result<(), BrokerError> {
    match outcome {
        Outcome::Ok => broker.ack(delivery.tag).await,
        Outcome::Transient(err) => {
            tracing::warn!(error = %err, routing_key = %delivery.routing_key, "handler failed, entering retry pipeline");
            broker.reject(delivery.tag).await?;
            let current = delivery.retries.unwrap_or(policy.default_retries);
            // `spec.md` §9 Open Questions: the zero-valued message is
            // dead-lettered *before* decrementing, header left at 0 on the
            // dead-lettered message — not decremented below zero.
            if current == 0 {
                broker
                    .republish(&policy.failed_exchange, &delivery.routing_key, delivery.body.clone(), 0)
                    .await
            } else {
                broker
                    .republish(&policy.retry_exchange, &delivery.routing_key, delivery.body.clone(), current - 1)
                    .await
            }
        }
        Outcome::Permanent(err) => {
            tracing::error!(error = %err, routing_key = %delivery.routing_key, "handler failed permanently, dead-lettering without retry");
            broker.reject(delivery.tag).await?;
            broker
                .republish(
                    &policy.failed_exchange,
                    &delivery.routing_key,
                    delivery.body.clone(),
                    delivery.retries.unwrap_or(0),
                )
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::DeliveryTag;
    use crate::fake::FakeBroker;
    use crate::outcome::HandlerError;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    fn delivery(retries: Option<u32>) -> Delivery {
        Delivery {
            tag: DeliveryTag(1),
            routing_key: "search.index".to_string(),
            body: br#"{"_table":"artist","id":7}"#.to_vec(),
            retries,
        }
    }

    #[tokio::test]
    async fn success_acks_and_settles_nothing_else() {
        let broker = FakeBroker::default();
        let policy = RetryPolicy::default();
        settle(&broker, &policy, &delivery(None), Outcome::Ok).await.unwrap();
        assert_eq!(broker.acked(), vec![DeliveryTag(1)]);
        assert!(broker.rejected().is_empty());
        assert!(broker.republished().is_empty());
    }

    /// S4 — transient failure with default headers: reject, republish to
    /// `search.retry` with `mb-retries = default - 1`, no ack.
    #[tokio::test]
    async fn transient_failure_with_default_headers_retries() {
        let broker = FakeBroker::default();
        let policy = RetryPolicy::default();
        settle(&broker, &policy, &delivery(None), Outcome::Transient(HandlerError::from(Boom)))
            .await
            .unwrap();
        assert!(broker.acked().is_empty());
        assert_eq!(broker.rejected(), vec![DeliveryTag(1)]);
        let republished = broker.republished();
        assert_eq!(republished.len(), 1);
        assert_eq!(republished[0].0, "search.retry");
        assert_eq!(republished[0].2, 3);
    }

    /// S5 — dead-letter: incoming `mb-retries = 0` publishes to
    /// `search.failed` instead of `search.retry`; the header stays 0.
    #[tokio::test]
    async fn transient_failure_at_zero_retries_dead_letters() {
        let broker = FakeBroker::default();
        let policy = RetryPolicy::default();
        settle(&broker, &policy, &delivery(Some(0)), Outcome::Transient(HandlerError::from(Boom)))
            .await
            .unwrap();
        let republished = broker.republished();
        assert_eq!(republished.len(), 1);
        assert_eq!(republished[0].0, "search.failed");
        assert_eq!(republished[0].2, 0);
    }

    #[tokio::test]
    async fn retry_decrement_reaches_zero_after_default_failures() {
        let broker = FakeBroker::default();
        let policy = RetryPolicy::default();
        let mut retries = None;
        for n in 0..policy.default_retries {
            settle(
                &broker,
                &policy,
                &delivery(retries),
                Outcome::Transient(HandlerError::from(Boom)),
            )
            .await
            .unwrap();
            let last = broker.republished().last().cloned().unwrap();
            retries = Some(last.2);
            assert_eq!(last.2, policy.default_retries - 1 - n);
        }
        assert_eq!(retries, Some(0));
    }

    #[tokio::test]
    async fn permanent_failure_dead_letters_without_consulting_retry_budget() {
        let broker = FakeBroker::default();
        let policy = RetryPolicy::default();
        settle(
            &broker,
            &policy,
            &delivery(Some(3)),
            Outcome::Permanent(HandlerError::from(Boom)),
        )
        .await
        .unwrap();
        let republished = broker.republished();
        assert_eq!(republished[0].0, "search.failed");
        assert!(broker.acked().is_empty());
    }

    #[tokio::test]
    async fn undecodable_body_is_treated_as_permanent_failure() {
        let broker = FakeBroker::default();
        let policy = RetryPolicy::default();
        struct AlwaysOk;
        #[async_trait]
        impl Handler for AlwaysOk {
            async fn handle(&self, _message: WireMessage, _queue: QueueKind) -> Outcome {
                Outcome::Ok
            }
        }
        let mut bad = delivery(Some(2));
        bad.body = b"not json".to_vec();
        process_delivery(&broker, &AlwaysOk, &policy, QueueKind::Index, bad)
            .await
            .unwrap();
        let republished = broker.republished();
        assert_eq!(republished[0].0, "search.failed");
        assert!(broker.acked().is_empty());
    }

    #[tokio::test]
    async fn decodable_body_reaches_the_handler() {
        let broker = FakeBroker::default();
        let policy = RetryPolicy::default();
        struct Echo;
        #[async_trait]
        impl Handler for Echo {
            async fn handle(&self, message: WireMessage, queue: QueueKind) -> Outcome {
                assert_eq!(message.table, "artist");
                assert_eq!(queue, QueueKind::Index);
                Outcome::Ok
            }
        }
        process_delivery(&broker, &Echo, &policy, QueueKind::Index, delivery(None))
            .await
            .unwrap();
        assert_eq!(broker.acked(), vec![DeliveryTag(1)]);
    }
}
