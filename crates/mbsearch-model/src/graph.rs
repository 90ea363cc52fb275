use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies a model (entity) kind in the metadata graph, e.g. `"area"` or
/// a profile such as `"custom_area"`. Distinct from the table name: a model
/// kind may be an "entity profile" (a base entity plus computed columns)
/// backed by the same physical table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelKind(pub String);

impl ModelKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelKind {
    fn from(s: &str) -> Self {
        ModelKind(s.to_string())
    }
}

impl From<String> for ModelKind {
    fn from(s: String) -> Self {
        ModelKind(s)
    }
}

/// The physical table backing a model kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableName(pub String);

impl TableName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TableName {
    fn from(s: &str) -> Self {
        TableName(s.to_string())
    }
}

impl From<String> for TableName {
    fn from(s: String) -> Self {
        TableName(s)
    }
}

/// Direction of a relationship, as seen from the entity declaring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// The declaring entity holds the foreign key (N rows point to 1 target).
    ManyToOne,
    /// The target (or a link table) holds the foreign key — 1-to-many or
    /// many-to-many from the declaring entity's point of view.
    ToMany,
}

/// A relationship from one model kind to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub target: ModelKind,
    pub direction: Direction,
    /// For `ManyToOne` relationships, the local (non-composite) foreign-key
    /// column name. `spec.md` assumes non-composite FKs; schema validation
    /// enforces this at build time (see `mbsearch-schema`).
    pub local_column: Option<String>,
    /// For `ToMany` relationships, the foreign-key column on the *target*
    /// table that points back to the declaring entity. This is what lets
    /// `mbsearch-router` resolve a reverse path ending in a to-many hop
    /// without joining the changed table at all: the FK value is already
    /// present in the change message, so the join can stop one hop short
    /// and filter on it directly (see `mbsearch-router`'s reverse resolver
    /// and `DESIGN.md`'s account of `spec.md` §8 scenario S3).
    pub remote_column: Option<String>,
}

/// A plain column on a model kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
}

/// Everything the path algebra needs to know about one model kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMeta {
    pub table: TableName,
    pub relationships: BTreeMap<String, Relationship>,
    pub columns: BTreeMap<String, ColumnMeta>,
    /// Composite (multi-column) properties: name -> physical column names.
    pub composites: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("model kind '{0}' is already registered")]
    DuplicateKind(String),
    #[error("model kind '{0}' is not registered")]
    UnknownKind(String),
}

/// The immutable metadata graph: every model kind, its table, relationships
/// and columns. Built once via [`GraphBuilder`] and shared read-only for the
/// lifetime of the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    entities: BTreeMap<ModelKind, EntityMeta>,
}

impl Graph {
    pub fn entity(&self, kind: &ModelKind) -> Option<&EntityMeta> {
        self.entities.get(kind)
    }

    pub fn table(&self, kind: &ModelKind) -> Option<&TableName> {
        self.entities.get(kind).map(|e| &e.table)
    }

    pub fn relationship(&self, kind: &ModelKind, name: &str) -> Option<&Relationship> {
        self.entities.get(kind)?.relationships.get(name)
    }

    pub fn column(&self, kind: &ModelKind, name: &str) -> Option<&ColumnMeta> {
        self.entities.get(kind)?.columns.get(name)
    }

    pub fn composite(&self, kind: &ModelKind, name: &str) -> Option<&[String]> {
        self.entities
            .get(kind)?
            .composites
            .get(name)
            .map(|v| v.as_slice())
    }

    pub fn kinds(&self) -> impl Iterator<Item = &ModelKind> {
        self.entities.keys()
    }
}

/// Builder for a [`Graph`]. Used by `mbsearch-schema`'s musicbrainz fixture
/// and by tests that need a minimal graph.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    entities: BTreeMap<ModelKind, EntityMeta>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, kind: impl Into<ModelKind>, table: impl Into<TableName>) -> Self {
        self.entities.insert(
            kind.into(),
            EntityMeta {
                table: table.into(),
                relationships: BTreeMap::new(),
                columns: BTreeMap::new(),
                composites: BTreeMap::new(),
            },
        );
        self
    }

    pub fn column(mut self, kind: impl Into<ModelKind>, name: impl Into<String>) -> Self {
        let kind = kind.into();
        let entry = self
            .entities
            .get_mut(&kind)
            .unwrap_or_else(|| panic!("entity '{kind}' must be declared before its columns"));
        let name = name.into();
        entry.columns.insert(name.clone(), ColumnMeta { name });
        self
    }

    pub fn composite(
        mut self,
        kind: impl Into<ModelKind>,
        name: impl Into<String>,
        columns: Vec<String>,
    ) -> Self {
        let kind = kind.into();
        let entry = self
            .entities
            .get_mut(&kind)
            .unwrap_or_else(|| panic!("entity '{kind}' must be declared before its composites"));
        entry.composites.insert(name.into(), columns);
        self
    }

    pub fn many_to_one(
        mut self,
        kind: impl Into<ModelKind>,
        name: impl Into<String>,
        target: impl Into<ModelKind>,
        local_column: impl Into<String>,
    ) -> Self {
        let kind = kind.into();
        let entry = self.entities.get_mut(&kind).unwrap_or_else(|| {
            panic!("entity '{kind}' must be declared before its relationships")
        });
        entry.relationships.insert(
            name.into(),
            Relationship {
                target: target.into(),
                direction: Direction::ManyToOne,
                local_column: Some(local_column.into()),
                remote_column: None,
            },
        );
        self
    }

    /// `remote_column` is the FK column on `target` that points back to
    /// `kind` — required so reverse-path resolution can stop one hop short
    /// of the changed table (see [`Relationship::remote_column`]).
    pub fn to_many(
        mut self,
        kind: impl Into<ModelKind>,
        name: impl Into<String>,
        target: impl Into<ModelKind>,
        remote_column: impl Into<String>,
    ) -> Self {
        let kind = kind.into();
        let entry = self.entities.get_mut(&kind).unwrap_or_else(|| {
            panic!("entity '{kind}' must be declared before its relationships")
        });
        entry.relationships.insert(
            name.into(),
            Relationship {
                target: target.into(),
                direction: Direction::ToMany,
                local_column: None,
                remote_column: Some(remote_column.into()),
            },
        );
        self
    }

    pub fn build(self) -> Graph {
        Graph {
            entities: self.entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_roundtrip() {
        let graph = GraphBuilder::new()
            .entity("area", "area")
            .column("area", "name")
            .entity("artist", "artist")
            .many_to_one("artist", "area", "area", "area")
            .build();

        assert_eq!(
            graph.table(&ModelKind::new("area")).unwrap().as_str(),
            "area"
        );
        assert!(graph.column(&ModelKind::new("area"), "name").is_some());
        let rel = graph
            .relationship(&ModelKind::new("artist"), "area")
            .unwrap();
        assert_eq!(rel.target.as_str(), "area");
        assert_eq!(rel.local_column.as_deref(), Some("area"));
    }

    #[test]
    fn missing_kind_returns_none_not_panic() {
        let graph = GraphBuilder::new().build();
        assert!(graph.entity(&ModelKind::new("nope")).is_none());
    }
}
