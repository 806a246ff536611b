// library crate for npc-lookup
// per-character snapshots and filter matching for npc distribution rules

pub mod conditions;
pub mod config;
pub mod exclusive;
pub mod forms;
pub mod lookup;

pub use exclusive::{ExclusiveGroupRegistry, ExclusiveGroups};
pub use forms::{Actor, Form, FormDatabase, FormId, FormKind, FormType, NpcHandle, PluginFile};
pub use lookup::{FormIdent, FormOrPlugin, Snapshot};
