//! Immutable declaration of every indexed entity: root model, fields, extra
//! paths, boost and serializer (`spec.md` §3/§4.B).
//!
//! This crate only describes *what* to index; it has no opinion on *how*
//! to fetch or dispatch documents (that's `mbsearch-materialize` and
//! `mbsearch-dispatch`) or on which tables depend on which cores (that's
//! `mbsearch-depindex`).

mod entity;
mod field;
mod registry;
pub mod musicbrainz;
mod transform;
mod value;

pub use entity::{Document, EntityDescriptor, ExtraQueryPredicate, Serializer};
pub use field::FieldDescriptor;
pub use registry::{SchemaError, SchemaRegistry};
pub use transform::Transform;
pub use value::{Branch, FieldValue};
