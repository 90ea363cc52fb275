use std::sync::Arc;

use mbsearch_depindex::DepIndex;
use mbsearch_model::Graph;
use mbsearch_router::ChangeRouter;
use mbsearch_schema::SchemaRegistry;

use crate::config::ConsumerConfig;
use crate::error::ServiceError;

/// The explicit runtime state threaded through the consumer and handlers,
/// replacing the source's module-level globals for the schema, the search
/// connection, and the version-check result (`spec.md` §9 Design Notes:
/// "a language-neutral redesign packages these into an explicit runtime
/// context threaded through the consumer and handlers; tests construct a
/// fresh context per case").
///
/// Everything here is read-only after [`RuntimeContext::build`] and shared
/// via `Arc` without synchronization (`spec.md` §5), matching the worker
/// model: each worker owns its own database session and calls into this
/// context, never mutating it.
#[derive(Clone)]
pub struct RuntimeContext {
    pub graph: Arc<Graph>,
    pub registry: Arc<SchemaRegistry>,
    pub depindex: Arc<DepIndex>,
    pub config: ConsumerConfig,
}

impl RuntimeContext {
    /// Validates the schema against the model graph and derives the
    /// dependency index (`spec.md` §4.C). A structural error here — an
    /// unresolvable path, a duplicate core — is fatal: the caller should
    /// propagate it out of `main` before any worker starts (`spec.md` §7).
    pub fn build(
        graph: Graph,
        registry: SchemaRegistry,
        config: ConsumerConfig,
    ) -> Result<Self, ServiceError> {
        let depindex = DepIndex::build(&graph, &registry)?;
        Ok(Self {
            graph: Arc::new(graph),
            registry: Arc::new(registry),
            depindex: Arc::new(depindex),
            config,
        })
    }

    /// A fresh [`ChangeRouter`] (component E) over this context's shared
    /// graph and dependency index. Cheap — both fields are `Arc` clones.
    pub fn router(&self) -> ChangeRouter {
        ChangeRouter::new(self.graph.clone(), self.depindex.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;

    use mbsearch_model::GraphBuilder;
    use mbsearch_schema::{EntityDescriptor, Serializer};

    #[derive(Debug)]
    struct NullSerializer;
    impl Serializer for NullSerializer {
        fn serialize(&self, _doc: &mbsearch_schema::Document) -> serde_json::Value {
            serde_json::Value::Null
        }
    }

    #[test]
    fn build_succeeds_for_a_valid_schema_and_exposes_shared_state() {
        let graph = GraphBuilder::new()
            .entity("artist", "artist")
            .column("artist", "gid")
            .build();
        let descriptor = EntityDescriptor::new("artist", 1.5, StdArc::new(NullSerializer));
        let registry =
            SchemaRegistry::build(&graph, vec![("artist".to_string(), descriptor)]).unwrap();

        let ctx = RuntimeContext::build(graph, registry, ConsumerConfig::default()).unwrap();
        assert!(ctx.registry.get("artist").is_some());
        assert!(ctx.depindex.is_tracked(&mbsearch_model::TableName::from("artist")));
    }

    #[test]
    fn build_fails_fast_on_structural_schema_error() {
        let graph = GraphBuilder::new().entity("artist", "artist").build();
        let descriptor = EntityDescriptor::new("artist", 1.5, StdArc::new(NullSerializer))
            .with_fields(vec![mbsearch_schema::FieldDescriptor::new(
                "area",
                "no_such_rel.name",
            )]);
        let err =
            SchemaRegistry::build(&graph, vec![("artist".to_string(), descriptor)]).unwrap_err();
        assert!(matches!(err, mbsearch_schema::SchemaError::UnresolvablePath { .. }));
    }
}
