use serde::{Deserialize, Serialize};

/// Default `mb-retries` budget when a message arrives without the header
/// (`spec.md` §4.F step 1 / §6: "Default initial value 4 if absent").
pub const DEFAULT_RETRY_BUDGET: u32 = 4;

/// Everything `mbsearch-indexer` needs to connect to the broker and name
/// its queues/exchanges. Loaded from environment variables with the wire
/// names `spec.md` §6 fixes (`search.index`, `search.delete`,
/// `search.retry`, `search.failed`) as defaults, following the env-var
/// configuration chain the rest of this lineage uses (plain
/// `std::env::var` + `unwrap_or_else`, no config-file layer — there's
/// nothing else for this service to configure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    pub amqp_url: String,
    pub queue_index: String,
    pub queue_delete: String,
    pub queue_retry: String,
    pub exchange_retry: String,
    pub exchange_failed: String,
    pub default_retries: u32,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            amqp_url: std::env::var("MBSEARCH_AMQP_URL")
                .unwrap_or_else(|_| "amqp://127.0.0.1:5672/%2f".to_string()),
            queue_index: std::env::var("MBSEARCH_QUEUE_INDEX")
                .unwrap_or_else(|_| "search.index".to_string()),
            queue_delete: std::env::var("MBSEARCH_QUEUE_DELETE")
                .unwrap_or_else(|_| "search.delete".to_string()),
            queue_retry: std::env::var("MBSEARCH_QUEUE_RETRY")
                .unwrap_or_else(|_| "search.retry".to_string()),
            exchange_retry: std::env::var("MBSEARCH_EXCHANGE_RETRY")
                .unwrap_or_else(|_| "search.retry".to_string()),
            exchange_failed: std::env::var("MBSEARCH_EXCHANGE_FAILED")
                .unwrap_or_else(|_| "search.failed".to_string()),
            default_retries: std::env::var("MBSEARCH_DEFAULT_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_BUDGET),
        }
    }
}

impl ConsumerConfig {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// How many primary keys `mbsearch-reindex` batches into one materializer
/// call, and how many worker tasks run those batches concurrently
/// (`spec.md` §5: "the key-enumeration driver partitions primary keys into
/// fixed-size windows and dispatches each window to a worker pool").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReindexConfig {
    pub batch_size: usize,
    pub workers: usize,
}

impl Default for ReindexConfig {
    fn default() -> Self {
        Self {
            batch_size: std::env::var("MBSEARCH_REINDEX_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            workers: std::env::var("MBSEARCH_REINDEX_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }
}

impl ReindexConfig {
    pub fn from_env() -> Self {
        Self::default()
    }
}
