use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use mbsearch_model::PrimaryKey;
use mbsearch_schema::{Branch, Document, FieldValue, SchemaRegistry};
use thiserror::Error;

use crate::database::{Database, RawEntity};

/// Transient/structural failures materializing a batch (`spec.md` §7:
/// database driver errors are Transient, surfaced to the retry pipeline).
/// Per-row failures (a missing entity, a transform that panics) are not
/// represented here — they are reported per row in [`MaterializeReport`]
/// so one bad row never aborts its siblings (`spec.md` §4.D).
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("core '{core}' is not registered")]
    UnknownCore { core: String },
    #[error("database error fetching core '{core}': {message}")]
    Database { core: String, message: String },
}

/// A row present in the database result whose document could not be built
/// (`spec.md` §7 "Semantic" error: a transform raised on a specific row).
/// Logged and skipped; the batch continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub pk: PrimaryKey,
    pub reason: String,
}

/// Outcome of materializing one `(core, pk_set)` batch.
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    /// Successfully materialized documents, serialized and ready for
    /// `mbsearch-dispatch`.
    pub documents: Vec<(PrimaryKey, serde_json::Value)>,
    /// Rows the database returned but that failed to materialize.
    pub skipped: Vec<SkippedRow>,
    /// Primary keys requested but absent from the database result
    /// (`spec.md` §7 "Data" error: the row no longer exists; logged and
    /// treated as success since the downstream index state is necessarily
    /// consistent with an absent row).
    pub missing: Vec<PrimaryKey>,
}

/// Component D: given `(core, pk_set)`, fetches the object graph via
/// [`Database`], applies field transforms, attaches the boost, and hands
/// each document to the core's serializer.
pub struct Materializer<D: Database> {
    registry: Arc<SchemaRegistry>,
    database: D,
}

impl<D: Database> Materializer<D> {
    pub fn new(registry: Arc<SchemaRegistry>, database: D) -> Self {
        Self { registry, database }
    }

    pub async fn materialize(
        &self,
        core: &str,
        plan: &mbsearch_depindex::QueryPlan,
        pk_set: &[PrimaryKey],
    ) -> Result<MaterializeReport, MaterializeError> {
        let descriptor = self
            .registry
            .get(core)
            .ok_or_else(|| MaterializeError::UnknownCore { core: core.to_string() })?;

        let rows = self
            .database
            .fetch(core, plan, pk_set, descriptor.extra_query())
            .await?;

        let mut report = MaterializeReport::default();
        let fetched: BTreeMap<&PrimaryKey, &RawEntity> = rows.iter().map(|r| (&r.pk, r)).collect();

        for pk in pk_set {
            let Some(row) = fetched.get(pk) else {
                tracing::info!(core, pk = %pk, "materialization query returned no row, treating as already-absent");
                report.missing.push(pk.clone());
                continue;
            };

            match build_document(descriptor, row) {
                Ok(doc) => {
                    let body = descriptor.serializer().serialize(&doc);
                    report.documents.push((row.pk.clone(), body));
                }
                Err(reason) => {
                    tracing::warn!(core, pk = %pk, reason, "skipping row: transform failed");
                    report.skipped.push(SkippedRow {
                        pk: pk.clone(),
                        reason,
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Builds one [`Document`] from a fetched row. Transform application is
/// wrapped in `catch_unwind`: `spec.md` §4.D requires a transform failure
/// to report a per-document Semantic error (`spec.md` §7) without
/// poisoning sibling rows in the same batch.
fn build_document(
    descriptor: &mbsearch_schema::EntityDescriptor,
    row: &RawEntity,
) -> Result<Document, String> {
    let mut fields = BTreeMap::new();
    for field in descriptor.fields() {
        let branches: Vec<Branch<'_>> = field
            .paths()
            .iter()
            .flat_map(|path| {
                row.values
                    .get(path.as_str())
                    .into_iter()
                    .flatten()
                    .map(move |value| Branch {
                        path: path.as_str(),
                        value: value.clone(),
                    })
            })
            .collect();

        let outcome = catch_unwind(AssertUnwindSafe(|| match field.transform() {
            Some(transform) => transform.apply(&branches),
            None => combine(&branches),
        }))
        .map_err(|_| format!("transform for field '{}' panicked", field.name()))?;

        fields.insert(field.name().to_string(), outcome);
    }

    Ok(Document {
        pk: row.pk.clone(),
        boost: descriptor.boost(),
        fields,
    })
}

/// Default combination for a field with no transform: a single path yields
/// its scalar value directly; a fanned-out field with no transform yields
/// every branch's value as a list (the XML serializer emits one term per
/// branch in the original system).
fn combine(branches: &[Branch<'_>]) -> FieldValue {
    match branches {
        [] => FieldValue::Null,
        [one] => one.value.clone(),
        many => FieldValue::List(many.iter().map(|b| b.value.clone()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mbsearch_schema::ExtraQueryPredicate;

    use super::*;

    struct FixedDatabase {
        rows: Vec<RawEntity>,
    }

    #[async_trait]
    impl Database for FixedDatabase {
        async fn fetch(
            &self,
            _core: &str,
            _plan: &mbsearch_depindex::QueryPlan,
            pk_set: &[PrimaryKey],
            _extra_query: Option<&dyn ExtraQueryPredicate>,
        ) -> Result<Vec<RawEntity>, MaterializeError> {
            Ok(self
                .rows
                .iter()
                .filter(|r| pk_set.contains(&r.pk))
                .cloned()
                .collect())
        }
    }

    fn registry_and_plan() -> (Arc<SchemaRegistry>, mbsearch_depindex::QueryPlan) {
        let (graph, registry) = mbsearch_schema::musicbrainz::build().unwrap();
        let index = mbsearch_depindex::DepIndex::build(&graph, &registry).unwrap();
        let plan = index.forward("artist").unwrap().clone();
        (Arc::new(registry), plan)
    }

    #[tokio::test]
    async fn materializes_a_found_row_into_a_document() {
        let (registry, plan) = registry_and_plan();
        let pk = PrimaryKey::single("id", 7i64);
        let row = RawEntity::new(pk.clone())
            .with_value("gid", "90d7709d-feba-47e6-a2d1-8770da3c3d9c")
            .with_value("name", "Test Artist");
        let materializer = Materializer::new(registry, FixedDatabase { rows: vec![row] });

        let report = materializer.materialize("artist", &plan, &[pk.clone()]).await.unwrap();
        assert_eq!(report.documents.len(), 1);
        assert!(report.missing.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.documents[0].0, pk);
    }

    #[tokio::test]
    async fn missing_row_is_reported_not_errored() {
        let (registry, plan) = registry_and_plan();
        let materializer = Materializer::new(registry, FixedDatabase { rows: vec![] });

        let pk = PrimaryKey::single("id", 404i64);
        let report = materializer.materialize("artist", &plan, &[pk.clone()]).await.unwrap();
        assert!(report.documents.is_empty());
        assert_eq!(report.missing, vec![pk]);
    }

    #[tokio::test]
    async fn upsert_idempotence_same_row_twice_yields_equal_documents() {
        let (registry, plan) = registry_and_plan();
        let pk = PrimaryKey::single("id", 7i64);
        let row = RawEntity::new(pk.clone()).with_value("name", "Stable Name");
        let materializer = Materializer::new(registry, FixedDatabase { rows: vec![row] });

        let first = materializer.materialize("artist", &plan, &[pk.clone()]).await.unwrap();
        let second = materializer.materialize("artist", &plan, &[pk.clone()]).await.unwrap();
        assert_eq!(first.documents, second.documents);
    }

    #[tokio::test]
    async fn unknown_core_is_an_error() {
        let (registry, plan) = registry_and_plan();
        let materializer = Materializer::new(registry, FixedDatabase { rows: vec![] });
        let err = materializer
            .materialize("not-a-core", &plan, &[PrimaryKey::single("id", 1i64)])
            .await
            .unwrap_err();
        assert!(matches!(err, MaterializeError::UnknownCore { core } if core == "not-a-core"));
    }
}
