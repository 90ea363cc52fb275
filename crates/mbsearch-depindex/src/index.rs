use std::collections::{BTreeMap, BTreeSet};

use mbsearch_model::{Graph, ModelKind, TableName};
use mbsearch_paths::Path;
use mbsearch_schema::SchemaRegistry;
use serde::{Deserialize, Serialize};

use crate::build::{self, DepIndexError};

/// The set of relationship paths a core needs eager-loaded to materialize
/// one document, no more and no less. The union of every field path and
/// extra path declared on the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub root: ModelKind,
    pub paths: BTreeSet<Path>,
}

/// One entry of `inverse[table]`: which core a change to `table` might
/// affect, and how to walk back from that table to the core's root primary
/// key. `reverse_path` is `None` when `table` *is* the core's root table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InverseEntry {
    pub core: String,
    pub reverse_path: Option<Path>,
}

/// The immutable, derived dependency index. Built once via
/// [`DepIndex::build`](crate::build::build) and shared read-only for the
/// lifetime of the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepIndex {
    pub(crate) forward: BTreeMap<String, QueryPlan>,
    pub(crate) inverse: BTreeMap<TableName, BTreeSet<InverseEntry>>,
    pub(crate) columns: BTreeMap<TableName, BTreeSet<String>>,
    pub(crate) core_by_root_table: BTreeMap<TableName, String>,
}

impl DepIndex {
    /// Builds the dependency index from a validated schema registry and its
    /// backing model graph (`spec.md` §4.C).
    pub fn build(graph: &Graph, registry: &SchemaRegistry) -> Result<Self, DepIndexError> {
        build::build(graph, registry)
    }

    pub fn forward(&self, core: &str) -> Option<&QueryPlan> {
        self.forward.get(core)
    }

    pub fn inverse(&self, table: &TableName) -> impl Iterator<Item = &InverseEntry> {
        self.inverse.get(table).into_iter().flatten()
    }

    pub fn is_tracked(&self, table: &TableName) -> bool {
        self.inverse.get(table).is_some_and(|set| !set.is_empty())
    }

    pub fn columns(&self, table: &TableName) -> Option<&BTreeSet<String>> {
        self.columns.get(table)
    }

    pub fn core_by_root_table(&self, table: &TableName) -> Option<&str> {
        self.core_by_root_table.get(table).map(|s| s.as_str())
    }

    pub fn core_names(&self) -> impl Iterator<Item = &str> {
        self.forward.keys().map(|s| s.as_str())
    }
}
