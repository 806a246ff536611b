// shared utilities for integration tests

use std::path::PathBuf;

use npc_lookup::{Actor, Form, FormDatabase, FormId, Snapshot};

pub const BANDIT_ACTOR: u32 = 0xFF000801;
pub const VAMPIRE_ACTOR: u32 = 0xFF000802;
pub const CHILD_ACTOR: u32 = 0xFF000803;

/// path to a file under tests/fixtures
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// load the shared form dump
pub fn load_fixture_db() -> FormDatabase {
    FormDatabase::load(&fixture_path("load_order.json5")).expect("Failed to load form dump")
}

pub fn actor(db: &FormDatabase, id: u32) -> &Actor {
    db.actor(FormId(id))
        .unwrap_or_else(|| panic!("actor {:08X} missing from fixture", id))
}

pub fn form<'db>(db: &'db FormDatabase, editor_id: &str) -> &'db Form {
    db.find_editor_id(editor_id)
        .unwrap_or_else(|| panic!("form '{}' missing from fixture", editor_id))
}

pub fn snapshot(db: &FormDatabase, id: u32) -> Snapshot<'_> {
    Snapshot::for_actor(db, actor(db, id)).expect("actor base is not an npc")
}
