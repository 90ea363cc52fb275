use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mbsearch_consumer::{Handler, HandlerError, Outcome, QueueKind, WireMessage};
use mbsearch_core::RuntimeContext;
use mbsearch_dispatch::CoreDispatch;
use mbsearch_materialize::{Database, Materializer};
use mbsearch_model::{PrimaryKey, TableName};
use mbsearch_router::{as_pk_value, RouteAction, ReverseResolver};

/// Drives components E -> D -> G for deliveries off the index and retry
/// queues (`spec.md` §4.F step 2: "Invoke the wrapped handler (E for
/// index/retry ...)").
pub struct RouterHandler<D: Database> {
    ctx: Arc<RuntimeContext>,
    materializer: Arc<Materializer<D>>,
    dispatch: Arc<CoreDispatch>,
    resolver: Arc<dyn ReverseResolver>,
}

impl<D: Database> RouterHandler<D> {
    pub fn new(
        ctx: Arc<RuntimeContext>,
        materializer: Arc<Materializer<D>>,
        dispatch: Arc<CoreDispatch>,
        resolver: Arc<dyn ReverseResolver>,
    ) -> Self {
        Self {
            ctx,
            materializer,
            dispatch,
            resolver,
        }
    }
}

#[async_trait]
impl<D: Database + 'static> Handler for RouterHandler<D> {
    async fn handle(&self, message: WireMessage, queue: QueueKind) -> Outcome {
        let change = message.into_change_message(queue);

        let actions = match self.ctx.router().route(&change, self.resolver.as_ref()).await {
            Ok(actions) => actions,
            Err(err) => return Outcome::Transient(HandlerError::from(err)),
        };

        for action in actions {
            match action {
                RouteAction::Upsert { core, pk_set } => {
                    let Some(plan) = self.ctx.depindex.forward(&core) else {
                        tracing::warn!(core, "route action names a core with no query plan, skipping");
                        continue;
                    };
                    let report = match self.materializer.materialize(&core, plan, &pk_set).await {
                        Ok(report) => report,
                        Err(err) => return Outcome::Transient(HandlerError::from(err)),
                    };
                    for skipped in &report.skipped {
                        tracing::warn!(core, pk = %skipped.pk, reason = %skipped.reason, "skipped row during materialization");
                    }
                    for (pk, body) in report.documents {
                        if let Err(err) = self.dispatch.upsert(&core, pk, body).await {
                            return Outcome::Transient(HandlerError::from(err));
                        }
                    }
                }
                RouteAction::Delete { core, pk } => {
                    if let Err(err) = self.dispatch.delete(&core, pk).await {
                        return Outcome::Transient(HandlerError::from(err));
                    }
                }
            }
        }
        Outcome::Ok
    }
}

/// The direct-delete path for the delete queue (`spec.md` §4.F step 2): a
/// root-table delete names its own core via `core_by_root_table`, with no
/// reverse-path resolution needed.
pub struct DeleteHandler {
    ctx: Arc<RuntimeContext>,
    dispatch: Arc<CoreDispatch>,
}

impl DeleteHandler {
    pub fn new(ctx: Arc<RuntimeContext>, dispatch: Arc<CoreDispatch>) -> Self {
        Self { ctx, dispatch }
    }
}

#[async_trait]
impl Handler for DeleteHandler {
    async fn handle(&self, message: WireMessage, _queue: QueueKind) -> Outcome {
        let table = TableName::from(message.table.clone());
        let Some(core) = self.ctx.depindex.core_by_root_table(&table) else {
            tracing::info!(table = %table, "delete on a table with no registered core, dropping");
            return Outcome::Ok;
        };

        let columns: BTreeMap<String, mbsearch_model::PkValue> = message
            .columns
            .iter()
            .filter_map(|(col, value)| as_pk_value(value).map(|v| (col.clone(), v)))
            .collect();
        if columns.is_empty() {
            return Outcome::Permanent(HandlerError::from(MalformedDelete {
                table: message.table,
            }));
        }
        let pk = PrimaryKey::from_columns(columns);

        match self.dispatch.delete(core, pk).await {
            Ok(()) => Outcome::Ok,
            Err(err) => Outcome::Transient(HandlerError::from(err)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("delete message for table '{table}' carries no identity column")]
struct MalformedDelete {
    table: String,
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mbsearch_depindex::QueryPlan;
    use mbsearch_dispatch::{fake::MemoryCore, SearchCore};
    use mbsearch_materialize::RawEntity;
    use mbsearch_router::fake::FakeResolver;
    use mbsearch_router::ReverseResolver;
    use mbsearch_schema::ExtraQueryPredicate;

    use super::*;

    struct FixedDatabase {
        rows: Vec<RawEntity>,
    }

    #[async_trait]
    impl Database for FixedDatabase {
        async fn fetch(
            &self,
            _core: &str,
            _plan: &QueryPlan,
            pk_set: &[PrimaryKey],
            _extra_query: Option<&dyn ExtraQueryPredicate>,
        ) -> Result<Vec<RawEntity>, mbsearch_materialize::MaterializeError> {
            Ok(self
                .rows
                .iter()
                .filter(|r| pk_set.contains(&r.pk))
                .cloned()
                .collect())
        }
    }

    fn runtime() -> Arc<RuntimeContext> {
        let (graph, registry) = mbsearch_schema::musicbrainz::build().unwrap();
        Arc::new(RuntimeContext::build(graph, registry, mbsearch_core::ConsumerConfig::default()).unwrap())
    }

    /// Every registered core gets an in-memory fake; the caller gets back
    /// the `artist` one directly so it can assert on what it recorded.
    fn dispatch_with_memory_cores(ctx: &RuntimeContext) -> (Arc<CoreDispatch>, Arc<MemoryCore>) {
        let artist = Arc::new(MemoryCore::new());
        let cores = ctx
            .registry
            .core_names()
            .map(|name| {
                let handle: Arc<dyn SearchCore> = if name == "artist" {
                    artist.clone()
                } else {
                    Arc::new(MemoryCore::new())
                };
                (name.to_string(), handle)
            })
            .collect();
        (Arc::new(CoreDispatch::build(cores).unwrap()), artist)
    }

    /// `spec.md` §8 S1 — root insert, driven through the real queue wiring:
    /// decode `{"_table":"artist","id":"7"}` off the index queue and run it
    /// through `RouterHandler` (component E -> D -> G). Expect exactly one
    /// materialization and one upsert for artist id=7, no reverse-path
    /// resolver calls.
    #[tokio::test]
    async fn s1_root_insert_off_the_index_queue_upserts_exactly_once() {
        let ctx = runtime();
        let (dispatch, artist_core) = dispatch_with_memory_cores(&ctx);

        let pk = PrimaryKey::single("id", "7");
        let row = RawEntity::new(pk.clone()).with_value("name", "Test Artist");
        let materializer = Arc::new(Materializer::new(ctx.registry.clone(), FixedDatabase { rows: vec![row] }));
        let resolver: Arc<dyn ReverseResolver> = Arc::new(FakeResolver::new());

        let handler = RouterHandler::new(ctx, materializer, dispatch, resolver);

        let message: WireMessage = serde_json::from_str(r#"{"_table":"artist","id":"7"}"#).unwrap();
        let outcome = handler.handle(message, QueueKind::Index).await;
        assert!(matches!(outcome, Outcome::Ok));

        assert_eq!(artist_core.upserts().len(), 1);
        assert_eq!(artist_core.upserts()[0].0, pk);
        assert!(artist_core.deletes().is_empty());
    }

    /// `spec.md` §8 S2 — delete, driven through the delete-queue handler:
    /// no reverse-path resolution needed, just `core_by_root_table` plus
    /// the carried primary key.
    #[tokio::test]
    async fn s2_delete_off_the_delete_queue_deletes_exactly_once() {
        let ctx = runtime();
        let (dispatch, artist_core) = dispatch_with_memory_cores(&ctx);
        let handler = DeleteHandler::new(ctx, dispatch);

        let message: WireMessage = serde_json::from_str(
            r#"{"_table":"artist","gid":"90d7709d-feba-47e6-a2d1-8770da3c3d9c"}"#,
        )
        .unwrap();
        let outcome = handler.handle(message, QueueKind::Delete).await;
        assert!(matches!(outcome, Outcome::Ok));

        assert_eq!(
            artist_core.deletes(),
            vec![PrimaryKey::single("gid", "90d7709d-feba-47e6-a2d1-8770da3c3d9c")]
        );
        assert!(artist_core.upserts().is_empty());
    }

    /// `spec.md` §8 S6 — an update whose changed columns are disjoint from
    /// `columns[table]` is acked with zero downstream dispatches, even
    /// through the real handler.
    #[tokio::test]
    async fn s6_irrelevant_column_update_dispatches_nothing() {
        let ctx = runtime();
        let (dispatch, artist_core) = dispatch_with_memory_cores(&ctx);
        let materializer = Arc::new(Materializer::new(ctx.registry.clone(), FixedDatabase { rows: vec![] }));
        let resolver: Arc<dyn ReverseResolver> = Arc::new(FakeResolver::new());
        let handler = RouterHandler::new(ctx, materializer, dispatch, resolver);

        // `area.place_count` is derived, not trigger-participating, and not
        // watched for any core reachable from `area`.
        let message: WireMessage =
            serde_json::from_str(r#"{"_table":"area","id":1,"place_count":9}"#).unwrap();
        let outcome = handler.handle(message, QueueKind::Index).await;
        assert!(matches!(outcome, Outcome::Ok));
        assert!(artist_core.upserts().is_empty());
    }
}
