//! Change router (component E).
//!
//! Given one committed row change and the dependency index, decides which
//! search-core documents it affects and emits the corresponding upsert or
//! delete actions. A change on a table no core depends on is dropped; an
//! update whose changed columns touch nothing a core tracks is dropped;
//! everything else resolves to a batch handed to `mbsearch-materialize`
//! (upserts) or straight to `mbsearch-dispatch` (root-table deletes).

mod message;
mod resolver;
mod router;

pub use message::{as_pk_value, ChangeMessage, Operation};
pub use resolver::fake;
pub use resolver::{ResolveError, ReverseFilter, ReverseResolver};
pub use router::{ChangeRouter, RouteAction, RouterError};
