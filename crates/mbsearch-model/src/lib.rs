//! Stand-in for the relational database's ORM metadata graph.
//!
//! The real object-relational mapping lives outside this workspace — it is
//! specific to the upstream schema and owned by the database layer. This
//! crate models only the shape of that mapping the path algebra and
//! dependency index need: which model kinds exist, what relationships
//! connect them, and which columns (plain or composite) live on each.

mod graph;
mod pk;

pub use graph::{
    ColumnMeta, Direction, EntityMeta, Graph, GraphBuilder, GraphError, ModelKind, Relationship,
    TableName,
};
pub use pk::{PkValue, PrimaryKey};
