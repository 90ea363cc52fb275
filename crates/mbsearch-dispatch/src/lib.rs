//! Dispatcher to search cores (`spec.md` §4.G).
//!
//! One handle per core, offering `upsert`/`delete` against the external
//! search backend. The backend client itself (document upload, commit,
//! version check) is out of scope (`spec.md` §1); this crate only carries
//! the trait boundary, a per-core registry, and an in-memory fake for
//! tests.

mod registry;
mod traits;

pub mod fake;

pub use registry::{CoreDispatch, CoreDispatchError};
pub use traits::{DispatchError, SearchCore};
