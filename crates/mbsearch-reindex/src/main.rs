//! The bulk-reindex driver: enumerate primary keys per core, batch them,
//! materialize and dispatch in parallel (`spec.md` §2/§5).

mod database;
mod driver;
mod enumerator;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use database::UnwiredDatabase;
use driver::{DatabaseFactory, ReindexDriver};
use enumerator::UnwiredEnumerator;
use mbsearch_core::{ReindexConfig, RuntimeContext};
use mbsearch_dispatch::{fake::MemoryCore, CoreDispatch};
use mbsearch_schema::SchemaRegistry;

#[derive(Parser)]
#[command(name = "mbsearch-reindex")]
#[command(about = "Bulk-reindexes the musicbrainz search cores from the relational database")]
struct Cli {
    /// Reindex only this core; reindexes every registered core when absent.
    #[arg(long)]
    core: Option<String>,

    /// Primary keys per materializer batch, overriding MBSEARCH_REINDEX_BATCH_SIZE.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Concurrent worker tasks, overriding MBSEARCH_REINDEX_WORKERS.
    #[arg(long)]
    workers: Option<usize>,

    /// Emit JSON-formatted log lines.
    #[arg(long)]
    json: bool,
}

/// Hands every worker task a fresh, independent [`UnwiredDatabase`]. A real
/// deployment replaces this with a factory that opens a pooled connection
/// per call.
struct UnwiredDatabaseFactory;

impl DatabaseFactory for UnwiredDatabaseFactory {
    type Database = UnwiredDatabase;

    fn create(&self) -> Self::Database {
        UnwiredDatabase
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    mbsearch_core::init_tracing(cli.json, Level::INFO);

    let mut config = ReindexConfig::from_env();
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }

    let (graph, registry) =
        mbsearch_schema::musicbrainz::build().context("building the musicbrainz schema fixture")?;
    let dispatch = Arc::new(build_dispatch(&registry)?);
    let ctx = Arc::new(
        RuntimeContext::build(graph, registry, mbsearch_core::ConsumerConfig::default())
            .context("building the dependency index from the schema registry")?,
    );

    let driver = ReindexDriver::new(
        ctx.clone(),
        dispatch,
        Arc::new(UnwiredEnumerator),
        Arc::new(UnwiredDatabaseFactory),
        config,
    );

    match cli.core {
        Some(core) => {
            let report = driver
                .reindex_core(&core)
                .await
                .with_context(|| format!("reindexing core '{core}'"))?;
            tracing::info!(
                core = %report.core,
                enumerated = report.enumerated,
                indexed = report.indexed,
                skipped = report.skipped,
                missing = report.missing,
                "core reindex complete"
            );
        }
        None => {
            let reports = driver.reindex_all().await;
            let mut failed = 0;
            for (core, result) in reports {
                match result {
                    Ok(report) => tracing::info!(
                        core = %report.core,
                        enumerated = report.enumerated,
                        indexed = report.indexed,
                        skipped = report.skipped,
                        missing = report.missing,
                        "core reindex complete"
                    ),
                    Err(err) => {
                        failed += 1;
                        tracing::error!(core = %core, error = %err, "core reindex failed");
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} core(s) failed to reindex");
            }
        }
    }

    Ok(())
}

/// Wires every registered core to an in-memory search-core fake. `spec.md`
/// §1 puts the real search-backend client out of scope; a real deployment
/// replaces [`MemoryCore`] per core with an adapter over that client.
fn build_dispatch(registry: &SchemaRegistry) -> Result<CoreDispatch> {
    let cores = registry
        .core_names()
        .map(|name| {
            let handle: Arc<dyn mbsearch_dispatch::SearchCore> = Arc::new(MemoryCore::new());
            (name.to_string(), handle)
        })
        .collect();
    CoreDispatch::build(cores).context("building the per-core search dispatch table")
}
