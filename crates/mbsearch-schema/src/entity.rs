use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use mbsearch_model::{ModelKind, PrimaryKey};
use mbsearch_paths::Path;

use crate::field::FieldDescriptor;
use crate::value::FieldValue;

/// One materialized document, ready to hand to a [`Serializer`]. Produced
/// by `mbsearch-materialize` (component D); the boost is attached here
/// rather than carried per-field since `spec.md` §3 fixes it per entity
/// kind (currently 1.5 for every core).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub pk: PrimaryKey,
    pub boost: f64,
    pub fields: BTreeMap<String, FieldValue>,
}

/// The external document serializer (`spec.md` §1 Out of scope: "the
/// XML/document serializer that turns a materialized entity graph into a
/// search document"). Implemented outside this workspace; only the trait
/// boundary lives here.
pub trait Serializer: Send + Sync + fmt::Debug {
    fn serialize(&self, doc: &Document) -> serde_json::Value;
}

/// An extra-query predicate conjoined onto an entity's base query
/// (`spec.md` §3, e.g. "only annotations still referenced by a live
/// entity"). The predicate is opaque to the schema layer; the `Database`
/// trait in `mbsearch-materialize` is what actually interprets it.
pub trait ExtraQueryPredicate: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;
}

/// The declaration of one search core (`spec.md` §3, "Entity descriptor").
pub struct EntityDescriptor {
    root: ModelKind,
    fields: Vec<FieldDescriptor>,
    extra_paths: Vec<Path>,
    boost: f64,
    serializer: Arc<dyn Serializer>,
    extra_query: Option<Arc<dyn ExtraQueryPredicate>>,
}

impl EntityDescriptor {
    pub fn new(root: impl Into<ModelKind>, boost: f64, serializer: Arc<dyn Serializer>) -> Self {
        Self {
            root: root.into(),
            fields: Vec::new(),
            extra_paths: Vec::new(),
            boost,
            serializer,
            extra_query: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_extra_paths(mut self, paths: Vec<Path>) -> Self {
        self.extra_paths = paths;
        self
    }

    pub fn with_extra_query(mut self, predicate: Arc<dyn ExtraQueryPredicate>) -> Self {
        self.extra_query = Some(predicate);
        self
    }

    pub fn root(&self) -> &ModelKind {
        &self.root
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn extra_paths(&self) -> &[Path] {
        &self.extra_paths
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    pub fn serializer(&self) -> &dyn Serializer {
        self.serializer.as_ref()
    }

    pub fn extra_query(&self) -> Option<&dyn ExtraQueryPredicate> {
        self.extra_query.as_deref()
    }

    /// Every path declared on this entity: trigger-participating and
    /// non-participating field paths, plus extra paths. This is the input
    /// `mbsearch-depindex` feeds through `unique_split_paths` (`spec.md`
    /// §4.C step 2) and what `mbsearch-materialize` eager-loads (`spec.md`
    /// §4.D: "no more, no less").
    pub fn all_paths(&self) -> impl Iterator<Item = &Path> {
        self.fields
            .iter()
            .flat_map(|f| f.paths().iter())
            .chain(self.extra_paths.iter())
    }

    /// Paths that feed the dependency index (`spec.md` §4.C step 2: "every
    /// trigger-participating field plus every extra-path").
    pub fn tracked_paths(&self) -> impl Iterator<Item = &Path> {
        self.fields
            .iter()
            .filter(|f| f.trigger())
            .flat_map(|f| f.paths().iter())
            .chain(self.extra_paths.iter())
    }
}

impl fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("root", &self.root)
            .field("fields", &self.fields.len())
            .field("extra_paths", &self.extra_paths.len())
            .field("boost", &self.boost)
            .finish()
    }
}
