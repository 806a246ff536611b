//! per-character snapshot
//!
//! built once per character per evaluation cycle from an actor and its npc
//! base template. it copies out the facts filters look at (name, level,
//! flags, keyword tags, template lineage) and keeps borrowed handles to the
//! records it was built from.

use std::collections::HashMap;

use super::ident::FormIdent;
use crate::config::Settings;
use crate::forms::{Actor, Form, FormDatabase, FormId, FormType, NpcHandle};

#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub(super) db: &'a FormDatabase,
    pub(super) actor: &'a Actor,
    pub(super) npc: NpcHandle<'a>,
    pub(super) race: Option<&'a Form>,
    pub(super) name: &'a str,
    level: u16,
    child: bool,
    leveled: bool,
    /// lowercase tag -> tag as first inserted
    pub(super) keywords: HashMap<String, String>,
    /// template lineage, nearest override first
    pub(super) ids: Vec<FormIdent>,
    pub(super) max_list_depth: usize,
}

impl<'a> Snapshot<'a> {
    pub fn new(db: &'a FormDatabase, actor: &'a Actor, npc: NpcHandle<'a>) -> Self {
        Self::with_settings(db, actor, npc, &Settings::default())
    }

    pub fn with_settings(
        db: &'a FormDatabase,
        actor: &'a Actor,
        npc: NpcHandle<'a>,
        settings: &Settings,
    ) -> Self {
        let race = actor
            .race
            .or(npc.race)
            .and_then(|id| db.form(id))
            .filter(|form| form.form_type() == FormType::Race);

        let child = actor.child
            || race.is_some_and(|r| r.editor_id.contains(settings.child_race_marker.as_str()));

        let mut snapshot = Self {
            db,
            actor,
            npc,
            race,
            name: npc.data().name.as_str(),
            level: npc.level,
            child,
            leveled: actor.is_leveled_creature(),
            keywords: HashMap::new(),
            ids: build_lineage(db, actor, npc),
            max_list_depth: settings.max_list_depth,
        };

        snapshot.collect_keywords(&npc.data().keywords);
        if let Some(race) = race.and_then(Form::as_race) {
            snapshot.collect_keywords(&race.keywords);
        }

        tracing::debug!(
            actor = %actor.id,
            npc = %npc.id(),
            keywords = snapshot.keywords.len(),
            lineage = snapshot.ids.len(),
            "built snapshot"
        );

        snapshot
    }

    /// build a snapshot for an actor, resolving its base template
    pub fn for_actor(db: &'a FormDatabase, actor: &'a Actor) -> Option<Self> {
        Self::for_actor_with_settings(db, actor, &Settings::default())
    }

    pub fn for_actor_with_settings(
        db: &'a FormDatabase,
        actor: &'a Actor,
        settings: &Settings,
    ) -> Option<Self> {
        let npc = db.npc(actor.base)?;
        Some(Self::with_settings(db, actor, npc, settings))
    }

    fn collect_keywords(&mut self, keywords: &[FormId]) {
        for id in keywords {
            match self.db.form(*id) {
                Some(keyword) if !keyword.editor_id.is_empty() => {
                    self.insert_keyword(&keyword.editor_id);
                }
                Some(_) => {}
                None => tracing::debug!(keyword = %id, "skipping unresolved keyword"),
            }
        }
    }

    /// add a synthetic tag, returns false if it was already present
    pub fn insert_keyword(&mut self, keyword: &str) -> bool {
        let key = keyword.to_lowercase();
        if self.keywords.contains_key(&key) {
            return false;
        }
        self.keywords.insert(key, keyword.to_string());
        true
    }

    /// case-insensitive exact tag membership
    pub fn has_keyword_string(&self, keyword: &str) -> bool {
        self.keywords.contains_key(&keyword.to_lowercase())
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.values().map(String::as_str)
    }

    pub fn database(&self) -> &'a FormDatabase {
        self.db
    }

    pub fn npc(&self) -> NpcHandle<'a> {
        self.npc
    }

    pub fn actor(&self) -> &'a Actor {
        self.actor
    }

    pub fn race(&self) -> Option<&'a Form> {
        self.race
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn level(&self) -> u16 {
        self.level
    }

    pub fn is_child(&self) -> bool {
        self.child
    }

    pub fn is_leveled(&self) -> bool {
        self.leveled
    }

    /// template lineage, nearest override first
    pub fn ids(&self) -> &[FormIdent] {
        &self.ids
    }

    /// perk rank from either the actor or its base template
    pub fn perk_rank(&self, perk: FormId) -> u8 {
        let actor_rank = self
            .actor
            .perks
            .iter()
            .filter(|p| p.perk == perk)
            .map(|p| p.rank)
            .max()
            .unwrap_or(0);
        actor_rank.max(self.npc.perk_rank(perk))
    }
}

fn push_ident(db: &FormDatabase, ids: &mut Vec<FormIdent>, id: FormId, field: &str) {
    match db.form(id) {
        Some(form) => ids.push(FormIdent::from(form)),
        None => tracing::debug!(form = %id, field, "skipping unresolved lineage entry"),
    }
}

fn build_lineage(db: &FormDatabase, actor: &Actor, npc: NpcHandle<'_>) -> Vec<FormIdent> {
    let mut ids = Vec::new();

    if let Some(template) = npc.base_template {
        push_ident(db, &mut ids, template, "base_template");
    }

    match &actor.leveled {
        Some(leveled) => {
            if let Some(original) = leveled.original_base {
                push_ident(db, &mut ids, original, "original_base");
            }
            for template in leveled.templates.iter().flatten() {
                push_ident(db, &mut ids, *template, "templates");
            }
        }
        None => ids.push(FormIdent::from(npc.form())),
    }

    // leveled data with nothing resolvable still identifies as the base
    if ids.is_empty() {
        ids.push(FormIdent::from(npc.form()));
    }

    ids
}
