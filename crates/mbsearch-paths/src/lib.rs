//! Path algebra over the ORM metadata graph.
//!
//! Parses, splits and walks dotted relationship paths such as
//! `artist_credit.artists.artist.gid`, resolving a path to its terminal
//! entity kind, its penultimate entity kind, and the classification of the
//! column(s) at its tail. This is the foundation the schema registry and
//! dependency index builder are built on.

mod algebra;
mod path;

pub use algebra::{last_model, second_last_model, tail_kind, unique_split_paths, TailKind};
pub use path::{Path, PathError, TABLENAME_SENTINEL};
