// integration tests for loading form dumps

use std::fs;

use npc_lookup::forms::DatabaseError;
use npc_lookup::{FormDatabase, FormId, FormType};

use crate::common::{fixture_path, load_fixture_db};

#[test]
fn test_fixture_is_consistent() {
    let db = load_fixture_db();

    let errors = db.validate();
    assert!(errors.is_empty(), "dangling references: {:?}", errors);
    assert_eq!(db.plugins().len(), 3);
    assert_eq!(db.actors().count(), 3);
}

#[test]
fn test_fixture_form_types() {
    let db = load_fixture_db();

    let list = db.find_editor_id("TweaksHostileList").unwrap();
    assert_eq!(list.form_type(), FormType::FormList);
    assert_eq!(
        db.plugin_for_form(list.id).map(|p| p.name.as_str()),
        Some("Tweaks.esl")
    );

    let npc = db.npc(FormId(0x0200283A)).unwrap();
    assert_eq!(npc.name, "Vampire");
    assert_eq!(npc.level, 30);
}

#[test]
fn test_load_missing_file() {
    let err = FormDatabase::load(&fixture_path("does_not_exist.json5")).unwrap_err();
    assert!(matches!(err, DatabaseError::Io { .. }));
    assert!(err.to_string().contains("does_not_exist.json5"));
}

#[test]
fn test_load_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dupes.json5");
    fs::write(
        &path,
        r#"{
            forms: [
                { id: "0x10", editor_id: "A", type: "faction" },
                { id: "0x10", editor_id: "B", type: "faction" },
            ],
        }"#,
    )
    .unwrap();

    let err = FormDatabase::load(&path).unwrap_err();
    assert!(matches!(err, DatabaseError::DuplicateForm(FormId(0x10))));
}

#[test]
fn test_dangling_references_reported() {
    let db = FormDatabase::from_json5(
        r#"{
            forms: [
                { id: "0x20", editor_id: "Npc", type: "npc", race: "0x99", keywords: ["0x98"] },
                { id: "0x21", editor_id: "List", type: "form_list", forms: ["0x97"] },
            ],
            actors: [{ id: "0xFF000800", base: "0x20", editor_location: "0x96" }],
        }"#,
    )
    .unwrap();

    let errors = db.validate();
    assert_eq!(errors.len(), 4);
    let messages: Vec<_> = errors.iter().map(ToString::to_string).collect();
    assert!(messages.iter().any(|m| m.contains("00000099") && m.contains("race")));
    assert!(messages.iter().any(|m| m.contains("00000097") && m.contains("forms")));
    assert!(messages
        .iter()
        .any(|m| m.contains("00000096") && m.contains("editor_location")));
}
