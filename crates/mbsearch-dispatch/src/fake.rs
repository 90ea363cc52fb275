//! In-memory [`SearchCore`] for tests, following the `MemoryCasStore`/
//! `MemoryRunLedger` fake pattern used elsewhere in this lineage: a
//! `Mutex`-guarded in-memory store satisfying the trait contract without an
//! external search backend.

use std::sync::Mutex;

use async_trait::async_trait;
use mbsearch_model::PrimaryKey;

use crate::traits::{DispatchError, SearchCore};

/// Records every upsert and delete it sees, in call order. Tests assert
/// against [`MemoryCore::upserts`]/[`MemoryCore::deletes`] directly rather
/// than standing up a real search backend (`spec.md` §8 S1/S2/S3).
#[derive(Debug, Default)]
pub struct MemoryCore {
    upserts: Mutex<Vec<(PrimaryKey, serde_json::Value)>>,
    deletes: Mutex<Vec<PrimaryKey>>,
}

impl MemoryCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upserts(&self) -> Vec<(PrimaryKey, serde_json::Value)> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<PrimaryKey> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchCore for MemoryCore {
    async fn upsert(&self, pk: PrimaryKey, body: serde_json::Value) -> Result<(), DispatchError> {
        self.upserts.lock().unwrap().push((pk, body));
        Ok(())
    }

    async fn delete(&self, pk: PrimaryKey) -> Result<(), DispatchError> {
        self.deletes.lock().unwrap().push(pk);
        Ok(())
    }
}

/// A [`SearchCore`] that always fails, for exercising the retry/dead-letter
/// pipeline (`spec.md` §4.F) without a real backend.
#[derive(Debug, Default)]
pub struct FailingCore {
    message: String,
}

impl FailingCore {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[async_trait]
impl SearchCore for FailingCore {
    async fn upsert(&self, pk: PrimaryKey, _body: serde_json::Value) -> Result<(), DispatchError> {
        Err(DispatchError::Transport {
            core: pk.to_string(),
            message: self.message.clone(),
        })
    }

    async fn delete(&self, pk: PrimaryKey) -> Result<(), DispatchError> {
        Err(DispatchError::Transport {
            core: pk.to_string(),
            message: self.message.clone(),
        })
    }
}
