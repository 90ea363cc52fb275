//! Ambient stack shared by the `mbsearch-indexer` and `mbsearch-reindex`
//! binaries: the explicit [`RuntimeContext`] that replaces the source's
//! module-level globals (`spec.md` §9 Design Notes), environment-driven
//! configuration, top-level error aggregation, and telemetry setup.
//!
//! This crate has no opinion on *what* the service does — that's every
//! other `mbsearch-*` crate — only on how the binaries assemble and run
//! them.

mod config;
mod context;
mod error;
mod telemetry;

pub use config::{ConsumerConfig, ReindexConfig, DEFAULT_RETRY_BUDGET};
pub use context::RuntimeContext;
pub use error::ServiceError;
pub use telemetry::init_tracing;
