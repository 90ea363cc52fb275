use std::sync::Arc;

use mbsearch_core::{ReindexConfig, RuntimeContext};
use mbsearch_dispatch::{CoreDispatch, DispatchError};
use mbsearch_materialize::{Database, MaterializeError, Materializer};
use mbsearch_model::PrimaryKey;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::enumerator::{EnumerateError, PkEnumerator};

#[derive(Debug, Error)]
pub enum ReindexError {
    #[error("core '{0}' is not registered")]
    UnknownCore(String),
    #[error(transparent)]
    Enumerate(#[from] EnumerateError),
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Produces one fresh [`Database`] per worker task (`spec.md` §5: "each
/// worker holds its own database session and materializer instance").
/// Letting the driver construct one connection up front and share it would
/// reintroduce the cross-task synchronization the source's connection pool
/// otherwise hides; a factory keeps that ownership explicit instead.
pub trait DatabaseFactory: Send + Sync {
    type Database: Database;

    fn create(&self) -> Self::Database;
}

/// Totals for one core's bulk reindex, reported back to `main` for the
/// summary log line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReindexReport {
    pub core: String,
    pub enumerated: usize,
    pub indexed: usize,
    pub skipped: usize,
    pub missing: usize,
}

/// Component D/G driven in bulk across every primary key of a core's root
/// table, instead of the single pk-set a live change message carries
/// (`spec.md` §2: "A driver enumerates primary keys per entity kind,
/// batches them, calls D, then G, parallelized per §5").
pub struct ReindexDriver<F: DatabaseFactory> {
    ctx: Arc<RuntimeContext>,
    dispatch: Arc<CoreDispatch>,
    enumerator: Arc<dyn PkEnumerator>,
    db_factory: Arc<F>,
    config: ReindexConfig,
}

impl<F: DatabaseFactory + 'static> ReindexDriver<F> {
    pub fn new(
        ctx: Arc<RuntimeContext>,
        dispatch: Arc<CoreDispatch>,
        enumerator: Arc<dyn PkEnumerator>,
        db_factory: Arc<F>,
        config: ReindexConfig,
    ) -> Self {
        Self {
            ctx,
            dispatch,
            enumerator,
            db_factory,
            config,
        }
    }

    /// Reindexes every row of one core's root table: enumerates its
    /// primary keys, partitions them into `config.batch_size` windows, and
    /// runs up to `config.workers` windows concurrently, each through its
    /// own [`Database`] and [`Materializer`].
    pub async fn reindex_core(&self, core: &str) -> Result<ReindexReport, ReindexError> {
        let plan = self
            .ctx
            .depindex
            .forward(core)
            .ok_or_else(|| ReindexError::UnknownCore(core.to_string()))?
            .clone();

        let pks = self.enumerator.primary_keys(&plan.root).await?;
        let enumerated = pks.len();
        tracing::info!(core, count = enumerated, "enumerated primary keys");

        let windows: Vec<Vec<PrimaryKey>> = pks
            .chunks(self.config.batch_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut joins: JoinSet<Result<(usize, usize, usize), ReindexError>> = JoinSet::new();

        for window in windows {
            let semaphore = semaphore.clone();
            let registry = self.ctx.registry.clone();
            let dispatch = self.dispatch.clone();
            let database = self.db_factory.create();
            let plan = plan.clone();
            let core = core.to_string();

            joins.spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
                let materializer = Materializer::new(registry, database);
                let report = materializer.materialize(&core, &plan, &window).await?;

                for (pk, body) in report.documents {
                    dispatch.upsert(&core, pk, body).await?;
                }

                Ok((report.missing.len(), report.skipped.len(), window.len()))
            });
        }

        let mut indexed = 0usize;
        let mut skipped = 0usize;
        let mut missing = 0usize;
        while let Some(outcome) = joins.join_next().await {
            let (window_missing, window_skipped, window_len) =
                outcome.expect("worker task panicked")?;
            missing += window_missing;
            skipped += window_skipped;
            indexed += window_len - window_missing - window_skipped;
        }

        Ok(ReindexReport {
            core: core.to_string(),
            enumerated,
            indexed,
            skipped,
            missing,
        })
    }

    /// Reindexes every core the schema registry knows about, in turn.
    /// `spec.md` §2 frames the bulk path as "reindex everything"; running
    /// cores one after another (each internally parallel per
    /// [`reindex_core`](Self::reindex_core)) keeps one core's failure from
    /// aborting the others' reports.
    pub async fn reindex_all(&self) -> Vec<(String, Result<ReindexReport, ReindexError>)> {
        let mut results = Vec::new();
        for core in self.ctx.registry.core_names() {
            let result = self.reindex_core(core).await;
            if let Err(err) = &result {
                tracing::error!(core, error = %err, "core reindex failed");
            }
            results.push((core.to_string(), result));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use mbsearch_dispatch::fake::MemoryCore;
    use mbsearch_materialize::RawEntity;
    use mbsearch_model::ModelKind;
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
            _plan: &mbsearch_depindex::QueryPlan,
            pk_set: &[PrimaryKey],
            _extra_query: Option<&dyn ExtraQueryPredicate>,
        ) -> Result<Vec<RawEntity>, MaterializeError> {
            Ok(self
                .rows
                .iter()
                .filter(|r| pk_set.contains(&r.pk))
                .cloned()
                .collect())
        }
    }

    struct FixedFactory {
        rows: Vec<RawEntity>,
    }

    impl DatabaseFactory for FixedFactory {
        type Database = FixedDatabase;

        fn create(&self) -> Self::Database {
            FixedDatabase {
                rows: self.rows.clone(),
            }
        }
    }

    struct FixedEnumerator {
        pks: Vec<PrimaryKey>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PkEnumerator for FixedEnumerator {
        async fn primary_keys(&self, _root: &ModelKind) -> Result<Vec<PrimaryKey>, EnumerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pks.clone())
        }
    }

    fn runtime() -> Arc<RuntimeContext> {
        let (graph, registry) = mbsearch_schema::musicbrainz::build().unwrap();
        Arc::new(RuntimeContext::build(graph, registry, mbsearch_core::ConsumerConfig::default()).unwrap())
    }

    fn dispatch_with_memory_cores(ctx: &RuntimeContext) -> Arc<CoreDispatch> {
        let cores = ctx
            .registry
            .core_names()
            .map(|name| {
                let handle: Arc<dyn mbsearch_dispatch::SearchCore> = Arc::new(MemoryCore::new());
                (name.to_string(), handle)
            })
            .collect();
        Arc::new(CoreDispatch::build(cores).unwrap())
    }

    #[tokio::test]
    async fn reindexes_every_enumerated_row_in_batches() {
        let ctx = runtime();
        let dispatch = dispatch_with_memory_cores(&ctx);

        let pks: Vec<PrimaryKey> = (1..=7i64).map(|id| PrimaryKey::single("id", id)).collect();
        let rows: Vec<RawEntity> = pks
            .iter()
            .map(|pk| RawEntity::new(pk.clone()).with_value("name", "Name"))
            .collect();

        let enumerator = Arc::new(FixedEnumerator {
            pks: pks.clone(),
            calls: AtomicUsize::new(0),
        });
        let factory = Arc::new(FixedFactory { rows });
        let config = ReindexConfig {
            batch_size: 3,
            workers: 2,
        };

        let driver = ReindexDriver::new(ctx, dispatch, enumerator, factory, config);
        let report = driver.reindex_core("artist").await.unwrap();

        assert_eq!(report.enumerated, 7);
        assert_eq!(report.indexed, 7);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.missing, 0);
    }

    #[tokio::test]
    async fn rows_absent_from_the_database_are_reported_missing_not_errored() {
        let ctx = runtime();
        let dispatch = dispatch_with_memory_cores(&ctx);

        let pks: Vec<PrimaryKey> = (1..=4i64).map(|id| PrimaryKey::single("id", id)).collect();
        // Only half of the enumerated keys actually have a row.
        let rows: Vec<RawEntity> = pks
            .iter()
            .take(2)
            .map(|pk| RawEntity::new(pk.clone()).with_value("name", "Name"))
            .collect();

        let enumerator = Arc::new(FixedEnumerator {
            pks: pks.clone(),
            calls: AtomicUsize::new(0),
        });
        let factory = Arc::new(FixedFactory { rows });
        let config = ReindexConfig {
            batch_size: 10,
            workers: 1,
        };

        let driver = ReindexDriver::new(ctx, dispatch, enumerator, factory, config);
        let report = driver.reindex_core("artist").await.unwrap();

        assert_eq!(report.enumerated, 4);
        assert_eq!(report.indexed, 2);
        assert_eq!(report.missing, 2);
    }

    #[tokio::test]
    async fn unknown_core_is_rejected_before_enumerating() {
        let ctx = runtime();
        let dispatch = dispatch_with_memory_cores(&ctx);
        let enumerator = Arc::new(FixedEnumerator {
            pks: vec![],
            calls: AtomicUsize::new(0),
        });
        let factory = Arc::new(FixedFactory { rows: vec![] });

        let driver = ReindexDriver::new(ctx, dispatch, enumerator.clone(), factory, ReindexConfig::default());
        let err = driver.reindex_core("not-a-core").await.unwrap_err();
        assert!(matches!(err, ReindexError::UnknownCore(core) if core == "not-a-core"));
        assert_eq!(enumerator.calls.load(Ordering::SeqCst), 0);
    }
}
