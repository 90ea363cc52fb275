use std::collections::BTreeMap;

use async_trait::async_trait;
use mbsearch_depindex::QueryPlan;
use mbsearch_model::PrimaryKey;
use mbsearch_schema::{ExtraQueryPredicate, FieldValue};

use crate::materializer::MaterializeError;

/// One row of the fetched object graph, already resolved down to the path
/// values the query plan asked for. A path may have produced zero, one, or
/// many values (fan-out along a collection), hence `Vec<FieldValue>` rather
/// than a single scalar. `spec.md` §1 puts the relational database and its
/// ORM out of scope: this is the shape the rest of this crate needs from
/// whatever executes the query for real.
#[derive(Debug, Clone, Default)]
pub struct RawEntity {
    pub pk: PrimaryKey,
    pub values: BTreeMap<String, Vec<FieldValue>>,
}

impl RawEntity {
    pub fn new(pk: PrimaryKey) -> Self {
        Self {
            pk,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, path: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.entry(path.into()).or_default().push(value.into());
        self
    }
}

/// The relational-database / ORM stand-in (`spec.md` §4.D). Implementations
/// live outside this workspace; this crate only depends on the trait
/// boundary. A real implementation constructs one query against the root
/// table filtered by `pk IN pk_set`, eager-loading exactly the
/// relationships named in `plan.paths` (`spec.md` §4.D: "no more, no less"),
/// conjoining `extra_query` onto the filter when present.
#[async_trait]
pub trait Database: Send + Sync {
    async fn fetch(
        &self,
        core: &str,
        plan: &QueryPlan,
        pk_set: &[PrimaryKey],
        extra_query: Option<&dyn ExtraQueryPredicate>,
    ) -> Result<Vec<RawEntity>, MaterializeError>;
}
