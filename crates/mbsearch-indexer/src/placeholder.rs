//! Stand-ins for the two external collaborators `spec.md` §1 puts out of
//! scope: the relational database (and its ORM) and the search backend's
//! reverse-path join capability. Both are trait boundaries this workspace
//! defines and tests against (`mbsearch_materialize::Database`,
//! `mbsearch_router::ReverseResolver`); a real deployment swaps these for
//! adapters over the actual musicbrainz database connection. Wiring one in
//! is the one piece of assembly this binary does not attempt to fake away
//! silently — every call logs loudly and fails transiently so a deployer
//! notices immediately rather than serving empty documents.

use async_trait::async_trait;
use mbsearch_depindex::QueryPlan;
use mbsearch_materialize::{Database, MaterializeError, RawEntity};
use mbsearch_model::{ModelKind, PrimaryKey};
use mbsearch_paths::Path;
use mbsearch_router::{ResolveError, ReverseFilter, ReverseResolver};
use mbsearch_schema::ExtraQueryPredicate;

/// Fails every fetch with a clearly-labelled transient error. Exists so
/// `mbsearch-indexer` is a complete, runnable binary out of the box; a
/// real deployment replaces this with an adapter over the actual
/// relational database (`spec.md` §1: out of scope).
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

/// Fails every reverse-path resolution the same way. A real deployment
/// replaces this with an adapter that runs the join `spec.md` §4.E
/// describes against the relational database.
#[derive(Debug, Default)]
pub struct UnwiredResolver;

#[async_trait]
impl ReverseResolver for UnwiredResolver {
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
            message: "no ReverseResolver adapter wired up; replace UnwiredResolver with a real one"
                .to_string(),
        })
    }
}
