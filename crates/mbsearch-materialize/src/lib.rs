//! Entity materializer (`spec.md` §4.D).
//!
//! Given `(core, pk_set)`, builds and executes the query graph that fetches
//! the full object tree for each primary key, applies every field's
//! transform, attaches the boost, and hands the result to the entity's
//! serializer. The relational database and its object-relational mapping
//! are out of scope (`spec.md` §1); this crate only depends on the
//! [`Database`] trait boundary.

mod database;
mod materializer;

pub use database::{Database, RawEntity};
pub use materializer::{MaterializeError, MaterializeReport, Materializer, SkippedRow};
