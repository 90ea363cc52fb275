//! Derived, read-only dependency index.
//!
//! Built once at startup from the model graph and the schema registry: a
//! forward map (core -> query plan) and an inverse map (table -> set of
//! `(core, reverse-path)`) plus a table -> watched-column set. The change
//! router (`mbsearch-router`) is the sole consumer at runtime.

mod build;
mod index;

pub use build::DepIndexError;
pub use index::{DepIndex, InverseEntry, QueryPlan};
