use std::collections::BTreeMap;
use std::sync::Arc;

use mbsearch_model::PrimaryKey;
use thiserror::Error;

use crate::traits::{DispatchError, SearchCore};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreDispatchError {
    #[error("core '{0}' is registered more than once")]
    DuplicateCore(String),
}

/// The set of search-core handles, constructed once (`spec.md` §5: "The
/// set of search-core handles is constructed once; each handle is
/// internally responsible for any synchronization it needs"). Routes
/// `upsert`/`delete` calls to the handle for a given core name.
#[derive(Clone)]
pub struct CoreDispatch {
    cores: BTreeMap<String, Arc<dyn SearchCore>>,
}

impl CoreDispatch {
    pub fn build(cores: Vec<(String, Arc<dyn SearchCore>)>) -> Result<Self, CoreDispatchError> {
        let mut map = BTreeMap::new();
        for (name, core) in cores {
            if map.insert(name.clone(), core).is_some() {
                return Err(CoreDispatchError::DuplicateCore(name));
            }
        }
        Ok(CoreDispatch { cores: map })
    }

    fn handle(&self, core: &str) -> Result<&Arc<dyn SearchCore>, DispatchError> {
        self.cores.get(core).ok_or_else(|| DispatchError::UnknownCore {
            core: core.to_string(),
        })
    }

    pub async fn upsert(
        &self,
        core: &str,
        pk: PrimaryKey,
        body: serde_json::Value,
    ) -> Result<(), DispatchError> {
        self.handle(core)?.upsert(pk, body).await
    }

    pub async fn delete(&self, core: &str, pk: PrimaryKey) -> Result<(), DispatchError> {
        self.handle(core)?.delete(pk).await
    }
}
