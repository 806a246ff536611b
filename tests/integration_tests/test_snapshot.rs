// integration tests for snapshot construction and filter predicates

use npc_lookup::{ExclusiveGroupRegistry, FormId, FormOrPlugin};

use crate::common::{form, load_fixture_db, snapshot, BANDIT_ACTOR, CHILD_ACTOR, VAMPIRE_ACTOR};

/// plain npc without templates or leveled data has a single lineage entry
#[test]
fn test_plain_npc_lineage() {
    let db = load_fixture_db();
    let snapshot = snapshot(&db, BANDIT_ACTOR);

    assert_eq!(snapshot.ids().len(), 1);
    assert_eq!(snapshot.ids()[0].editor_id(), "EncBandit01Melee");
    assert_eq!(snapshot.name(), "Bandit");
    assert_eq!(snapshot.level(), 9);
    assert!(!snapshot.is_leveled());
    assert!(!snapshot.is_child());
    assert_eq!(snapshot.race().unwrap().editor_id, "NordRace");
    assert_eq!(snapshot.actor().id, FormId(BANDIT_ACTOR));
    assert_eq!(snapshot.npc().id(), FormId(0x0003DF08));
}

/// leveled actor: original base first, then populated slots in order
#[test]
fn test_leveled_lineage() {
    let db = load_fixture_db();
    let snapshot = snapshot(&db, VAMPIRE_ACTOR);

    let names: Vec<_> = snapshot.ids().iter().map(|id| id.editor_id()).collect();
    assert_eq!(
        names,
        vec!["LvlBanditTemplate", "EncBandit01Melee", "DLC1EncVampire"]
    );
    assert!(snapshot.is_leveled());
}

#[test]
fn test_child_race() {
    let db = load_fixture_db();
    let snapshot = snapshot(&db, CHILD_ACTOR);

    assert!(snapshot.is_child());
    assert_eq!(snapshot.race().unwrap().editor_id, "NordRaceChild");
}

#[test]
fn test_tags_from_npc_and_race() {
    let db = load_fixture_db();
    let snapshot = snapshot(&db, VAMPIRE_ACTOR);

    // npc keywords
    assert!(snapshot.has_string_filter(&["vampire", "ActorTypeUndead"], true));
    // race keyword
    assert!(snapshot.has_string_filter(&["ACTORTYPENPC"], true));
}

#[test]
fn test_string_filter_any_vs_all() {
    let db = load_fixture_db();
    let mut snapshot = snapshot(&db, BANDIT_ACTOR);

    assert!(snapshot.insert_keyword("Bandit"));
    assert!(snapshot.has_string_filter(&["Bandit", "Thug"], false));
    assert!(!snapshot.has_string_filter(&["Bandit", "Thug"], true));
}

#[test]
fn test_string_filter_monotonic() {
    let db = load_fixture_db();
    let snapshot = snapshot(&db, VAMPIRE_ACTOR);

    let passing_all = ["Vampire", "NordKeywordMissing"];
    assert!(!snapshot.has_string_filter(&passing_all, true));
    // removing the failing token keeps/makes the all-list pass
    assert!(snapshot.has_string_filter(&passing_all[..1], true));

    // adding tokens to a passing any-list keeps it passing
    let mut tokens = vec!["Vampire"];
    assert!(snapshot.has_string_filter(&tokens, false));
    tokens.push("SomethingElse");
    assert!(snapshot.has_string_filter(&tokens, false));
}

#[test]
fn test_contains_string_filter() {
    let db = load_fixture_db();
    let snapshot = snapshot(&db, VAMPIRE_ACTOR);

    // lineage substring
    assert!(snapshot.contains_string_filter(&["lvlbandit"]));
    // tag substring
    assert!(snapshot.contains_string_filter(&["undead"]));
    assert!(!snapshot.contains_string_filter(&["draugr"]));
}

/// faction AND perk, both held
#[test]
fn test_form_filter_faction_and_perk() {
    let db = load_fixture_db();
    let bandit = snapshot(&db, BANDIT_ACTOR);
    let vampire = snapshot(&db, VAMPIRE_ACTOR);

    let entries = [
        FormOrPlugin::from(form(&db, "BanditFaction")),
        FormOrPlugin::from(form(&db, "LightArmorPerk")),
    ];

    assert!(bandit.has_form_filter(&entries, true));
    assert!(!vampire.has_form_filter(&entries, true));
    assert!(!vampire.has_form_filter(&entries, false));
}

#[test]
fn test_form_filter_nested_list() {
    let db = load_fixture_db();
    let list = form(&db, "TweaksHostileList");

    // vampire faction at the top level
    assert!(snapshot(&db, VAMPIRE_ACTOR).has_form(list));
    // perk inside the nested list
    assert!(snapshot(&db, BANDIT_ACTOR).has_form(list));
    assert!(!snapshot(&db, CHILD_ACTOR).has_form(list));
}

#[test]
fn test_form_filter_other_categories() {
    let db = load_fixture_db();
    let bandit = snapshot(&db, BANDIT_ACTOR);

    for name in [
        "Flames",
        "CombatWarrior",
        "BleakFallsBarrowLocation",
        "NordRace",
    ] {
        assert!(bandit.has_form(form(&db, name)), "expected {} to match", name);
    }
    // keywords only match through tags
    assert!(!bandit.has_form(form(&db, "ActorTypeNPC")));
}

#[test]
fn test_form_filter_plugins() {
    let db = load_fixture_db();
    let dawnguard = FormOrPlugin::from(db.plugin("Dawnguard.esm").unwrap());
    let skyrim = FormOrPlugin::from(db.plugin("Skyrim.esm").unwrap());

    let vampire = snapshot(&db, VAMPIRE_ACTOR);
    assert!(vampire.has_form_filter(&[dawnguard, skyrim], true));

    let bandit = snapshot(&db, BANDIT_ACTOR);
    assert!(!bandit.has_form_filter(&[dawnguard], false));
    assert!(bandit.has_form_filter(&[skyrim], false));
}

#[test]
fn test_lineage_npc_reference() {
    let db = load_fixture_db();
    let vampire = snapshot(&db, VAMPIRE_ACTOR);

    // the bandit npc is one of the vampire's leveled templates
    assert!(vampire.has_form(form(&db, "EncBandit01Melee")));
    assert!(!vampire.has_form(form(&db, "WRChildNPC")));
}

#[test]
fn test_mutually_exclusive_keyword() {
    let db = load_fixture_db();
    let config = npc_lookup::config::load(&crate::common::fixture_path("config.json5")).unwrap();
    let registry = ExclusiveGroupRegistry::from_config(&config, &db).unwrap();

    let vampire = snapshot(&db, VAMPIRE_ACTOR);
    let bandit = snapshot(&db, BANDIT_ACTOR);
    let perk = form(&db, "LightArmorPerk");

    // the vampire carries the excluded ActorTypeUndead tag
    assert!(vampire.has_mutually_exclusive_form(perk, &registry));
    assert!(!bandit.has_mutually_exclusive_form(perk, &registry));

    // allegiance group
    assert!(bandit.has_mutually_exclusive_form(form(&db, "VampireFaction"), &registry));
    assert!(vampire.has_mutually_exclusive_form(form(&db, "BanditFaction"), &registry));
    assert!(!bandit.has_mutually_exclusive_form(form(&db, "BanditFaction"), &registry));
}
