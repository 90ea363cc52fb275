use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use mbsearch_depindex::DepIndex;
use mbsearch_model::{Direction, Graph, PrimaryKey};
use mbsearch_paths::{second_last_model, tail_kind, TailKind};
use thiserror::Error;

use crate::message::{as_pk_value, ChangeMessage, Operation};
use crate::resolver::{ResolveError, ReverseFilter, ReverseResolver};

#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// What a change implies for the search index: re-materialize a batch of
/// rows, or drop one document outright.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteAction {
    Upsert { core: String, pk_set: Vec<PrimaryKey> },
    Delete { core: String, pk: PrimaryKey },
}

/// Component E. Given one [`ChangeMessage`] and the dependency index, works
/// out which cores and which primary keys are affected, resolving any
/// reverse path through a [`ReverseResolver`].
pub struct ChangeRouter {
    graph: Arc<Graph>,
    depindex: Arc<DepIndex>,
}

impl ChangeRouter {
    pub fn new(graph: Arc<Graph>, depindex: Arc<DepIndex>) -> Self {
        Self { graph, depindex }
    }

    pub async fn route(
        &self,
        message: &ChangeMessage,
        resolver: &dyn ReverseResolver,
    ) -> Result<Vec<RouteAction>, RouterError> {
        let entries: Vec<_> = self.depindex.inverse(&message.table).cloned().collect();
        if entries.is_empty() {
            return Ok(vec![]);
        }

        // `spec.md` §4.E step 2's column filter only governs non-root
        // (reverse-path) entries: a root-table message always carries its
        // own identity, so it always proceeds regardless of which columns
        // changed (S1 — a bare `{"_table":"artist","id":"7"}` carries no
        // watched column at all, yet must still upsert).
        let update_is_watched =
            message.operation != Operation::Update || self.touches_a_watched_column(message);

        let mut deletes = Vec::new();
        let mut upserts: BTreeMap<String, BTreeSet<PrimaryKey>> = BTreeMap::new();

        for entry in entries {
            match entry.reverse_path {
                None => self.route_root_table_change(message, &entry.core, &mut deletes, &mut upserts),
                Some(path) => {
                    if !update_is_watched {
                        continue;
                    }
                    let Some(plan) = self.depindex.forward(&entry.core) else {
                        tracing::warn!(core = entry.core, "inverse entry names a core with no forward query plan");
                        continue;
                    };
                    let Some(filter) = self.reverse_filter(&plan.root, &path, message) else {
                        continue;
                    };
                    let pks = resolver.resolve(&entry.core, &plan.root, &path, &filter).await?;
                    upserts.entry(entry.core.clone()).or_default().extend(pks);
                }
            }
        }

        let mut actions: Vec<RouteAction> = deletes;
        for (core, pk_set) in upserts {
            if !pk_set.is_empty() {
                actions.push(RouteAction::Upsert {
                    core,
                    pk_set: pk_set.into_iter().collect(),
                });
            }
        }
        Ok(actions)
    }

    /// A root-table delete is forwarded straight to the dispatcher with the
    /// primary key the message already carries — there is no row left to
    /// re-materialize. A root-table insert/update schedules a one-row
    /// upsert batch.
    fn route_root_table_change(
        &self,
        message: &ChangeMessage,
        core: &str,
        deletes: &mut Vec<RouteAction>,
        upserts: &mut BTreeMap<String, BTreeSet<PrimaryKey>>,
    ) {
        let columns: BTreeMap<String, mbsearch_model::PkValue> = message
            .columns
            .iter()
            .filter_map(|(col, value)| as_pk_value(value).map(|v| (col.clone(), v)))
            .collect();
        if columns.is_empty() {
            tracing::warn!(table = %message.table, "root-table change carries no usable identity column, dropping");
            return;
        }
        let pk = PrimaryKey::from_columns(columns);

        match message.operation {
            Operation::Delete => deletes.push(RouteAction::Delete {
                core: core.to_string(),
                pk,
            }),
            Operation::Insert | Operation::Update => {
                upserts.entry(core.to_string()).or_default().insert(pk);
            }
        }
    }

    /// A change on a non-root table is never deleted on the search side —
    /// whatever document depends on it is re-materialized instead, insert,
    /// update or delete alike, since the dependent row still exists.
    fn reverse_filter(
        &self,
        root: &mbsearch_model::ModelKind,
        reverse_path: &mbsearch_paths::Path,
        message: &ChangeMessage,
    ) -> Option<ReverseFilter> {
        let (penultimate, tail) = second_last_model(&self.graph, root, reverse_path)?;
        match tail_kind(&self.graph, &penultimate, &tail) {
            TailKind::ManyToOne => {
                let rel = self.graph.relationship(&penultimate, &tail)?;
                debug_assert_eq!(rel.direction, Direction::ManyToOne);
                let local_column = rel.local_column.clone()?;
                let row_id = message.column("id")?.clone();
                Some(ReverseFilter::Equals {
                    column: local_column,
                    value: row_id,
                })
            }
            TailKind::ToMany => {
                let rel = self.graph.relationship(&penultimate, &tail)?;
                debug_assert_eq!(rel.direction, Direction::ToMany);
                let remote_column = rel.remote_column.clone()?;
                let fk_value = message.column(&remote_column)?.clone();
                Some(ReverseFilter::Equals {
                    column: "id".to_string(),
                    value: fk_value,
                })
            }
            other => {
                tracing::warn!(?other, path = %reverse_path, "reverse path tail is neither many-to-one nor to-many, skipping");
                None
            }
        }
    }

    fn touches_a_watched_column(&self, message: &ChangeMessage) -> bool {
        match self.depindex.columns(&message.table) {
            Some(watched) => message.columns.keys().any(|c| watched.contains(c)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use mbsearch_model::{GraphBuilder, TableName};
    use mbsearch_paths::Path;
    use mbsearch_schema::{EntityDescriptor, FieldDescriptor, FieldValue, SchemaRegistry, Serializer};

    use super::*;
    use crate::fake::{FailingResolver, FakeResolver};

    #[derive(Debug)]
    struct NullSerializer;
    impl Serializer for NullSerializer {
        fn serialize(&self, _doc: &mbsearch_schema::Document) -> serde_json::Value {
            serde_json::Value::Null
        }
    }

    fn simple_fixture() -> (Arc<Graph>, Arc<DepIndex>) {
        let graph = GraphBuilder::new()
            .entity("area", "area")
            .column("area", "name")
            .entity("artist", "artist")
            .column("artist", "gid")
            .column("artist", "name")
            .many_to_one("artist", "area", "area", "area")
            .build();

        let descriptor = EntityDescriptor::new("artist", 1.0, Arc::new(NullSerializer)).with_fields(vec![
            FieldDescriptor::new("mbid", Path::new("gid")),
            FieldDescriptor::new("name", Path::new("name")),
            FieldDescriptor::new("area_name", Path::new("area.name")),
        ]);
        let registry = SchemaRegistry::build(&graph, vec![("artist".to_string(), descriptor)]).unwrap();
        let index = DepIndex::build(&graph, &registry).unwrap();
        (Arc::new(graph), Arc::new(index))
    }

    #[tokio::test]
    async fn unrelated_table_change_is_dropped_without_resolver_calls() {
        let (graph, index) = simple_fixture();
        let router = ChangeRouter::new(graph, index);
        let resolver = FakeResolver::new();

        let message = ChangeMessage::new("l_area_event", Operation::Insert, BTreeMap::new());
        let actions = router.route(&message, &resolver).await.unwrap();
        assert!(actions.is_empty());
        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn root_table_insert_emits_single_row_upsert() {
        let (graph, index) = simple_fixture();
        let router = ChangeRouter::new(graph, index);
        let resolver = FakeResolver::new();

        let message = ChangeMessage::new(
            "artist",
            Operation::Insert,
            BTreeMap::from([("id".to_string(), FieldValue::Int(7))]),
        );
        let actions = router.route(&message, &resolver).await.unwrap();
        assert_eq!(
            actions,
            vec![RouteAction::Upsert {
                core: "artist".to_string(),
                pk_set: vec![PrimaryKey::single("id", 7i64)],
            }]
        );
    }

    /// S1 — root insert, delivered the way the index queue actually decodes
    /// it: `{"_table":"artist","id":"7"}` has no watched column at all (no
    /// declared path has an `artist.id` tail), and index/retry deliveries
    /// carry `Operation::Update` regardless of insert-vs-update on the wire
    /// (`mbsearch-consumer::QueueKind::operation`). The root-table branch
    /// must still upsert — the column filter only governs non-root
    /// reverse-path fan-out.
    #[tokio::test]
    async fn root_table_update_with_only_pk_column_still_upserts() {
        let (graph, registry) = mbsearch_schema::musicbrainz::build().unwrap();
        let index = Arc::new(DepIndex::build(&graph, &registry).unwrap());
        let router = ChangeRouter::new(Arc::new(graph), index);
        let resolver = FakeResolver::new();

        let message = ChangeMessage::new(
            "artist",
            Operation::Update,
            BTreeMap::from([("id".to_string(), FieldValue::Text("7".to_string()))]),
        );
        let actions = router.route(&message, &resolver).await.unwrap();
        assert_eq!(
            actions,
            vec![RouteAction::Upsert {
                core: "artist".to_string(),
                pk_set: vec![PrimaryKey::single("id", "7")],
            }]
        );
        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn root_table_delete_emits_delete_with_message_pk() {
        let (graph, index) = simple_fixture();
        let router = ChangeRouter::new(graph, index);
        let resolver = FakeResolver::new();

        let message = ChangeMessage::new(
            "artist",
            Operation::Delete,
            BTreeMap::from([(
                "gid".to_string(),
                FieldValue::Text("90d7709d-feba-47e6-a2d1-8770da3c3d9c".to_string()),
            )]),
        );
        let actions = router.route(&message, &resolver).await.unwrap();
        assert_eq!(
            actions,
            vec![RouteAction::Delete {
                core: "artist".to_string(),
                pk: PrimaryKey::single("gid", "90d7709d-feba-47e6-a2d1-8770da3c3d9c"),
            }]
        );
    }

    #[tokio::test]
    async fn update_with_no_watched_column_change_is_dropped() {
        let (graph, index) = simple_fixture();
        let router = ChangeRouter::new(graph, index);
        let resolver = FakeResolver::new();

        // "area" carries a column the "artist" core never tracks.
        let message = ChangeMessage::new(
            "area",
            Operation::Update,
            BTreeMap::from([
                ("id".to_string(), FieldValue::Int(1)),
                ("place_count".to_string(), FieldValue::Int(9)),
            ]),
        );
        let actions = router.route(&message, &resolver).await.unwrap();
        assert!(actions.is_empty());
        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn non_root_many_to_one_change_resolves_via_local_column_filter() {
        let (graph, index) = simple_fixture();
        let router = ChangeRouter::new(graph, index);
        let resolver = FakeResolver::new().with_answer("artist", "area", vec![PrimaryKey::single("id", 1i64)]);

        let message = ChangeMessage::new(
            "area",
            Operation::Update,
            BTreeMap::from([
                ("id".to_string(), FieldValue::Int(5)),
                ("name".to_string(), FieldValue::Text("Renamed".to_string())),
            ]),
        );
        let actions = router.route(&message, &resolver).await.unwrap();
        assert_eq!(resolver.calls(), vec![("artist".to_string(), "area".to_string())]);
        assert_eq!(
            actions,
            vec![RouteAction::Upsert {
                core: "artist".to_string(),
                pk_set: vec![PrimaryKey::single("id", 1i64)],
            }]
        );
    }

    #[tokio::test]
    async fn resolver_failure_propagates() {
        let (graph, index) = simple_fixture();
        let router = ChangeRouter::new(graph, index);
        let resolver = FailingResolver::new("backend unavailable");

        let message = ChangeMessage::new(
            "area",
            Operation::Update,
            BTreeMap::from([
                ("id".to_string(), FieldValue::Int(5)),
                ("name".to_string(), FieldValue::Text("Renamed".to_string())),
            ]),
        );
        let err = router.route(&message, &resolver).await.unwrap_err();
        assert!(matches!(err, RouterError::Resolve(_)));
    }

    /// An `area_alias` change fans out to six `(core, reverse-path)` calls;
    /// the three distinct `artist` reverse paths resolving to the same row
    /// collapse into one entry in the final batch.
    #[tokio::test]
    async fn area_alias_change_fans_out_and_dedups_per_core() {
        let (graph, registry) = mbsearch_schema::musicbrainz::build().unwrap();
        let index = Arc::new(DepIndex::build(&graph, &registry).unwrap());
        let graph = Arc::new(graph);

        let entries: Vec<_> = index.inverse(&TableName::from("area_alias")).cloned().collect();
        assert_eq!(entries.len(), 6);

        let mut resolver = FakeResolver::new();
        for entry in &entries {
            let path = entry.reverse_path.as_ref().unwrap().as_str().to_string();
            let pk = if entry.core == "artist" {
                PrimaryKey::single("id", 1i64)
            } else {
                PrimaryKey::single("id", 2i64)
            };
            resolver = resolver.with_answer(entry.core.clone(), path, vec![pk]);
        }

        let router = ChangeRouter::new(graph, index);
        let message = ChangeMessage::new(
            "area_alias",
            Operation::Delete,
            BTreeMap::from([
                ("id".to_string(), FieldValue::Int(1)),
                ("area".to_string(), FieldValue::Int(2)),
                ("type".to_string(), FieldValue::Int(3)),
            ]),
        );

        let actions = router.route(&message, &resolver).await.unwrap();
        assert_eq!(resolver.calls().len(), 6);
        assert!(actions.iter().all(|a| matches!(a, RouteAction::Upsert { .. })));

        let artist_action = actions
            .iter()
            .find(|a| matches!(a, RouteAction::Upsert { core, .. } if core == "artist"))
            .unwrap();
        match artist_action {
            RouteAction::Upsert { pk_set, .. } => {
                assert_eq!(pk_set, &vec![PrimaryKey::single("id", 1i64)]);
            }
            _ => unreachable!(),
        }
    }
}
