use async_trait::async_trait;
use mbsearch_model::PrimaryKey;
use thiserror::Error;

/// Failures dispatching to the external search backend. `spec.md` §4.G:
/// "the core treats transport errors from G as handler failures" — callers
/// (`mbsearch-router`, `mbsearch-consumer`) fold this straight into the
/// retry pipeline (`spec.md` §4.F).
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("core '{core}' is not registered with the dispatcher")]
    UnknownCore { core: String },
    #[error("search backend transport error for core '{core}': {message}")]
    Transport { core: String, message: String },
}

/// One handle per search core (`spec.md` §4.G). `body` is whatever
/// `mbsearch_schema::Serializer` produced for this document (`spec.md`
/// §4.D: the materializer "hands the document to the serializer"; §2:
/// control flow is D -> G, so G receives the serializer's output, not the
/// pre-serialization `Document`). Batching, commit policy and retries
/// against the real backend are delegated to the external client; this
/// trait is the boundary. Must be safe to call from the consumer's handler
/// context (`spec.md` §5), hence `Send + Sync`.
#[async_trait]
pub trait SearchCore: Send + Sync {
    /// Upload or replace the document identified by `pk`.
    async fn upsert(&self, pk: PrimaryKey, body: serde_json::Value) -> Result<(), DispatchError>;

    /// Remove the document identified by `pk`.
    async fn delete(&self, pk: PrimaryKey) -> Result<(), DispatchError>;
}
