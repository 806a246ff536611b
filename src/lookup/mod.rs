//! per-character lookup data and filter matching
//!
//! a [`Snapshot`] is built once per character per evaluation cycle, queried
//! with any number of filters, then dropped. nothing is cached across cycles.

mod filters;
mod ident;
mod snapshot;
mod text;

pub use filters::FormOrPlugin;
pub use ident::FormIdent;
pub use snapshot::Snapshot;
pub use text::{icontains, iequals};
