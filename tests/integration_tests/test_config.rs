// integration tests for configuration loading

use std::fs;

use npc_lookup::config::{self, Config, ExclusiveGroupConfig};
use npc_lookup::lookup::Snapshot;
use npc_lookup::{ExclusiveGroupRegistry, ExclusiveGroups};

use crate::common::{actor, fixture_path, form, load_fixture_db, BANDIT_ACTOR};

#[test]
fn test_fixture_config_verifies() {
    let db = load_fixture_db();
    let config = config::load(&fixture_path("config.json5")).unwrap();

    assert_eq!(config.settings.max_list_depth, 8);
    assert_eq!(config.settings.child_race_marker, "RaceChild");

    let errors = config::verify(&config, &db);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
}

#[test]
fn test_registry_from_fixture_config() {
    let db = load_fixture_db();
    let config = config::load(&fixture_path("config.json5")).unwrap();
    let registry = ExclusiveGroupRegistry::from_config(&config, &db).unwrap();

    assert_eq!(registry.groups().len(), 2);
    let excluded = registry.mutually_exclusive_forms_for_form(form(&db, "BanditFaction").id);
    assert_eq!(excluded.len(), 1);
    assert!(excluded.contains(&form(&db, "VampireFaction").id));
}

#[test]
fn test_verify_flags_unknown_members() {
    let db = load_fixture_db();
    let config = Config {
        exclusive_groups: vec![ExclusiveGroupConfig {
            name: "typo".to_string(),
            forms: vec!["BanditFactoin".to_string(), "VampireFaction".to_string()],
        }],
        ..Default::default()
    };

    let errors = config::verify(&config, &db);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("did you mean: BanditFaction"));
}

#[test]
fn test_settings_change_child_detection() {
    let db = load_fixture_db();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.settings.child_race_marker = "Bandit".to_string();
    config::save(&path, &config).unwrap();

    let loaded = config::load(&path).unwrap();
    assert_eq!(loaded, config);

    // the marker is matched against the race editor id, not the npc
    let snapshot =
        Snapshot::for_actor_with_settings(&db, actor(&db, BANDIT_ACTOR), &loaded.settings).unwrap();
    assert!(!snapshot.is_child());
}

#[test]
fn test_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json5");
    fs::write(&path, "{ settings: { max_list_depth: \"deep\" } }").unwrap();

    let err = config::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
