use async_trait::async_trait;
use mbsearch_model::{ModelKind, PrimaryKey};
use mbsearch_paths::Path;
use mbsearch_schema::FieldValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("reverse-path resolution failed for core '{core}' path '{path}': {message}")]
    Failed {
        core: String,
        path: String,
        message: String,
    },
}

/// How to narrow a reverse-path query down to the rows actually affected.
/// The join itself — walking `reverse_path` from `root` down to the
/// relationship's target — is left to the implementation, since that's
/// where the real query/ORM layer lives; this only carries the filter a
/// changed row's own data determines.
#[derive(Debug, Clone, PartialEq)]
pub enum ReverseFilter {
    /// The relationship's target, joined in from `root` by `reverse_path`
    /// minus its last segment, must have `column` equal to `value`.
    Equals { column: String, value: FieldValue },
}

/// The relational-database stand-in for reverse-path resolution
/// (component E's one database dependency). Implementations live outside
/// this workspace; this crate only depends on the trait boundary.
#[async_trait]
pub trait ReverseResolver: Send + Sync {
    async fn resolve(
        &self,
        core: &str,
        root: &ModelKind,
        reverse_path: &Path,
        filter: &ReverseFilter,
    ) -> Result<Vec<PrimaryKey>, ResolveError>;
}

pub mod fake {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    /// Records every call it receives and answers from a fixed lookup table
    /// keyed by `(core, reverse_path)`, returning an empty result for any
    /// combination not present.
    #[derive(Default)]
    pub struct FakeResolver {
        answers: BTreeMap<(String, String), Vec<PrimaryKey>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeResolver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_answer(
            mut self,
            core: impl Into<String>,
            path: impl Into<String>,
            pks: Vec<PrimaryKey>,
        ) -> Self {
            self.answers.insert((core.into(), path.into()), pks);
            self
        }

        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReverseResolver for FakeResolver {
        async fn resolve(
            &self,
            core: &str,
            _root: &ModelKind,
            reverse_path: &Path,
            _filter: &ReverseFilter,
        ) -> Result<Vec<PrimaryKey>, ResolveError> {
            self.calls
                .lock()
                .unwrap()
                .push((core.to_string(), reverse_path.as_str().to_string()));
            Ok(self
                .answers
                .get(&(core.to_string(), reverse_path.as_str().to_string()))
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Always fails, for exercising the retry pipeline above this crate.
    pub struct FailingResolver {
        message: String,
    }

    impl FailingResolver {
        pub fn new(message: impl Into<String>) -> Self {
            Self { message: message.into() }
        }
    }

    #[async_trait]
    impl ReverseResolver for FailingResolver {
        async fn resolve(
            &self,
            core: &str,
            _root: &ModelKind,
            reverse_path: &Path,
            _filter: &ReverseFilter,
        ) -> Result<Vec<PrimaryKey>, ResolveError> {
            Err(ResolveError::Failed {
                core: core.to_string(),
                path: reverse_path.as_str().to_string(),
                message: self.message.clone(),
            })
        }
    }
}
