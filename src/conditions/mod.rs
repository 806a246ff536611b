//! condition evaluation for npc filters
//!
//! provides a small condition tree on top of the snapshot predicates:
//! - logical operators: all (AND), any (OR), not (NOT)
//! - exact and substring token matches
//! - form references (editor ids, `0x` form ids, plugin names)
//! - level range and child/leveled flags
//! - mutual exclusion checks
//!
//! conditions deserialize from JSON/JSON5 via serde.

mod eval;
mod types;

pub use eval::{evaluate, resolve_token, EvalContext};
pub use types::{Condition, FormMatch, LevelRange, StringMatch};
