//! The musicbrainz schema fixture: the real, non-trivial graph and entity
//! declarations `mbsearch-depindex`, `mbsearch-materialize` and
//! `mbsearch-router` are built and tested against.
//!
//! Transcribed from `original_source/sir/schema/__init__.py`; see
//! `DESIGN.md` for the data-driven approach used to keep ~90 model kinds and
//! ~130 relationships reviewable.

mod entities;
mod graph;
mod serializer;

pub use serializer::JsonDocumentSerializer;

use mbsearch_model::Graph;

use crate::registry::SchemaError;
use crate::SchemaRegistry;

/// Builds the full musicbrainz model graph and schema registry. Panics only
/// if the declarations below don't validate against the graph — a
/// programming error, not a runtime condition (`spec.md` §7: a fixture that
/// fails to build is fatal before any worker starts).
pub fn build() -> Result<(Graph, SchemaRegistry), SchemaError> {
    let graph = graph::build();
    let registry = SchemaRegistry::build(&graph, entities::entities())?;
    Ok((graph, registry))
}
