use async_trait::async_trait;
use mbsearch_model::{ModelKind, PrimaryKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("database error enumerating primary keys for '{root}': {message}")]
    Database { root: String, message: String },
}

/// Enumerates every primary key of a core's root table (`spec.md` §2:
/// "a driver enumerates primary keys per entity kind"). The relational
/// database is out of scope (`spec.md` §1); this is the trait boundary a
/// real deployment implements against the actual root-table scan (a
/// `SELECT id FROM <table> ORDER BY id` cursor, typically).
#[async_trait]
pub trait PkEnumerator: Send + Sync {
    async fn primary_keys(&self, root: &ModelKind) -> Result<Vec<PrimaryKey>, EnumerateError>;
}

/// Fails loudly rather than silently reindexing nothing. A real deployment
/// replaces this with an adapter over the musicbrainz database.
#[derive(Debug, Default)]
pub struct UnwiredEnumerator;

#[async_trait]
impl PkEnumerator for UnwiredEnumerator {
    async fn primary_keys(&self, root: &ModelKind) -> Result<Vec<PrimaryKey>, EnumerateError> {
        Err(EnumerateError::Database {
            root: root.as_str().to_string(),
            message: "no PkEnumerator adapter wired up; replace UnwiredEnumerator with a real one"
                .to_string(),
        })
    }
}
