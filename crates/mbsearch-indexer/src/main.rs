//! The message-consumer daemon (component F, wired to E -> D -> G).
//!
//! Subscribes to the index, delete, and retry queues (`spec.md` §4.F/§5:
//! "one [worker] per queue") and drives each delivery through the
//! ack/reject/retry/dead-letter protocol in `mbsearch-consumer`.

mod broker;
mod handlers;
mod placeholder;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use lapin::options::{BasicConsumeOptions, BasicQosOptions};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};
use tracing::Level;

use mbsearch_consumer::{process_delivery, Delivery, DeliveryTag, Handler, QueueKind, RetryPolicy};
use mbsearch_core::{ConsumerConfig, RuntimeContext};
use mbsearch_dispatch::{fake::MemoryCore, CoreDispatch};
use mbsearch_materialize::Materializer;
use mbsearch_schema::SchemaRegistry;

use broker::{retries_from_headers, LapinBroker};
use handlers::{DeleteHandler, RouterHandler};
use placeholder::{UnwiredDatabase, UnwiredResolver};

#[derive(Parser)]
#[command(name = "mbsearch-indexer")]
#[command(about = "Consumes search-index change messages and keeps the musicbrainz search cores in sync")]
struct Cli {
    /// Emit JSON-formatted log lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    mbsearch_core::init_tracing(cli.json, Level::INFO);

    let config = ConsumerConfig::from_env();
    let ctx = build_runtime_context(config.clone())?;
    let dispatch = Arc::new(build_dispatch(&ctx.registry)?);

    let materializer = Arc::new(Materializer::new(ctx.registry.clone(), UnwiredDatabase));
    let resolver = Arc::new(UnwiredResolver);

    let policy = Arc::new(RetryPolicy {
        retry_exchange: config.exchange_retry.clone(),
        failed_exchange: config.exchange_failed.clone(),
        default_retries: config.default_retries,
    });

    let connection = Connection::connect(&config.amqp_url, ConnectionProperties::default())
        .await
        .context("connecting to the AMQP broker")?;

    let router_handler: Arc<dyn Handler> = Arc::new(RouterHandler::new(
        ctx.clone(),
        materializer,
        dispatch.clone(),
        resolver,
    ));
    let delete_handler: Arc<dyn Handler> = Arc::new(DeleteHandler::new(ctx.clone(), dispatch));

    let index_task = spawn_queue_worker(
        &connection,
        config.queue_index.clone(),
        QueueKind::Index,
        router_handler.clone(),
        policy.clone(),
    )
    .await?;
    let retry_task = spawn_queue_worker(
        &connection,
        config.queue_retry.clone(),
        QueueKind::Retry,
        router_handler,
        policy.clone(),
    )
    .await?;
    let delete_task = spawn_queue_worker(
        &connection,
        config.queue_delete.clone(),
        QueueKind::Delete,
        delete_handler,
        policy,
    )
    .await?;

    tracing::info!("mbsearch-indexer running, one worker per queue");
    let _ = tokio::join!(index_task, retry_task, delete_task);
    Ok(())
}

fn build_runtime_context(config: ConsumerConfig) -> Result<Arc<RuntimeContext>> {
    let (graph, registry) = mbsearch_schema::musicbrainz::build()
        .context("building the musicbrainz schema fixture")?;
    let ctx = RuntimeContext::build(graph, registry, config)
        .context("building the dependency index from the schema registry")?;
    Ok(Arc::new(ctx))
}

/// Wires every registered core to an in-memory search-core fake.
/// `spec.md` §1 puts the real search-backend client out of scope; a real
/// deployment replaces [`MemoryCore`] per core with an adapter over that
/// client.
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

/// Subscribes to one queue on its own channel and spawns the tokio task
/// that drives every delivery through [`process_delivery`] (`spec.md` §5:
/// "The consumer runs on a small, fixed pool of worker threads ... one per
/// queue; each worker processes messages sequentially").
async fn spawn_queue_worker(
    connection: &Connection,
    queue: String,
    kind: QueueKind,
    handler: Arc<dyn Handler>,
    policy: Arc<RetryPolicy>,
) -> Result<tokio::task::JoinHandle<()>> {
    let channel = connection
        .create_channel()
        .await
        .with_context(|| format!("opening a channel for queue '{queue}'"))?;
    channel
        .basic_qos(1, BasicQosOptions::default())
        .await
        .context("setting channel prefetch")?;

    let mut consumer = channel
        .basic_consume(
            &queue,
            &format!("mbsearch-indexer-{queue}"),
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .with_context(|| format!("consuming queue '{queue}'"))?;

    let broker = Arc::new(LapinBroker::new(channel));

    Ok(tokio::spawn(async move {
        while let Some(delivery) = consumer.next().await {
            let delivery = match delivery {
                Ok(delivery) => delivery,
                Err(err) => {
                    tracing::error!(queue = %queue, error = %err, "broker delivery error");
                    continue;
                }
            };
            let headers = delivery.properties.headers().as_ref();
            let retries = retries_from_headers(headers);
            let mapped = Delivery {
                tag: DeliveryTag(delivery.delivery_tag),
                routing_key: delivery.routing_key.to_string(),
                body: delivery.data,
                retries,
            };
            if let Err(err) = process_delivery(broker.as_ref(), handler.as_ref(), &policy, kind, mapped).await {
                tracing::error!(queue = %queue, error = %err, "failed to settle delivery");
            }
        }
    }))
}
