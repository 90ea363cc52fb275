//! Message-consumer control plane (component F, `spec.md` §4.F/§6).
//!
//! An at-least-once, message-driven loop with bounded retries,
//! dead-lettering, and acknowledgement discipline. This crate models the
//! ack/reject/retry/dead-letter state machine and the wire message shape
//! against a [`Broker`] trait boundary; `mbsearch-indexer` wires that trait
//! to a real AMQP 0-9-1 connection and supplies the [`Handler`]
//! implementation that drives component E (`mbsearch-router`) and the
//! direct-delete path.

mod broker;
pub mod fake;
mod message;
mod outcome;
mod protocol;

/// Default `mb-retries` budget when a message arrives without the header
/// (`spec.md` §4.F step 1 / §6).
pub const DEFAULT_RETRY_BUDGET: u32 = 4;

pub use broker::{Broker, BrokerError, Delivery, DeliveryTag};
pub use message::{QueueKind, WireMessage};
pub use outcome::{HandlerError, Outcome};
pub use protocol::{process_delivery, settle, Handler, RetryPolicy};
