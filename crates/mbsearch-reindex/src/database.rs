use async_trait::async_trait;
use mbsearch_depindex::QueryPlan;
use mbsearch_materialize::{Database, MaterializeError, RawEntity};
use mbsearch_model::PrimaryKey;
use mbsearch_schema::ExtraQueryPredicate;

/// Fails every fetch with a clearly-labelled error. A real deployment
/// replaces this with an adapter over the actual relational database
/// (`spec.md` §1: out of scope); `mbsearch-reindex` constructs one fresh
/// instance per worker task (`spec.md` §5: "each worker holds its own
/// database session"), which this stand-in makes trivial since it carries
/// no state.
#[derive(Debug, Default)]
pub struct UnwiredDatabase;

#[async_trait]
impl Database for UnwiredDatabase {
    async fn fetch(
        &self,
        core: &str,
        _plan: &QueryPlan,
        _pk_set: &[PrimaryKey],
        _extra_query: Option<&dyn ExtraQueryPredicate>,
    ) -> Result<Vec<RawEntity>, MaterializeError> {
        Err(MaterializeError::Database {
            core: core.to_string(),
            message: "no Database adapter wired up; replace UnwiredDatabase with a real one"
                .to_string(),
        })
    }
}
