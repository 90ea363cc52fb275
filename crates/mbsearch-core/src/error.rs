use thiserror::Error;

use mbsearch_depindex::DepIndexError;
use mbsearch_dispatch::DispatchError;
use mbsearch_materialize::MaterializeError;
use mbsearch_router::RouterError;
use mbsearch_schema::SchemaError;

/// Top-level error aggregating every per-crate `thiserror` enum into one
/// type the binaries can propagate via `anyhow::Result` at `main`
/// (`spec.md` §7: "each crate defines its own error type ... composed into
/// a top-level `ServiceError`"). Structural failures (bad schema
/// declarations, depindex build failures) are fatal at
/// [`crate::RuntimeContext::build`] time, before any worker starts; the
/// remaining variants surface from request-scoped work (materialize,
/// route, dispatch) and are handled by `mbsearch-consumer`'s retry
/// pipeline rather than aborting the process.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("schema registration failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("dependency index build failed: {0}")]
    DepIndex(#[from] DepIndexError),

    #[error("change routing failed: {0}")]
    Route(#[from] RouterError),

    #[error("materialization failed: {0}")]
    Materialize(#[from] MaterializeError),

    #[error("search dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}
