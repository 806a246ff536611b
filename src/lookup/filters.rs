//! filter predicates evaluated against a snapshot

use std::collections::HashMap;
use std::fmt;

use super::snapshot::Snapshot;
use super::text::{icontains, iequals};
use crate::exclusive::ExclusiveGroups;
use crate::forms::{Form, FormId, FormKind, FormList, PluginFile};

/// a form filter entry: either a specific form or every form from a plugin
#[derive(Debug, Clone, Copy)]
pub enum FormOrPlugin<'a> {
    Form(&'a Form),
    Plugin(&'a PluginFile),
}

impl<'a> From<&'a Form> for FormOrPlugin<'a> {
    fn from(form: &'a Form) -> Self {
        FormOrPlugin::Form(form)
    }
}

impl<'a> From<&'a PluginFile> for FormOrPlugin<'a> {
    fn from(plugin: &'a PluginFile) -> Self {
        FormOrPlugin::Plugin(plugin)
    }
}

impl fmt::Display for FormOrPlugin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormOrPlugin::Form(form) => write!(f, "{}", form),
            FormOrPlugin::Plugin(plugin) => write!(f, "{}", plugin.name),
        }
    }
}

/// state of one form list expansion
#[derive(Default)]
struct ListWalk {
    /// lists on the current recursion path
    path: Vec<FormId>,
    /// lists already expanded, with the shallowest depth they were expanded at
    expanded: HashMap<FormId, usize>,
}

impl Snapshot<'_> {
    fn matches_string(&self, token: &str) -> bool {
        self.has_keyword_string(token)
            || iequals(self.name, token)
            || self.ids.iter().any(|id| *id == *token)
    }

    /// exact (case-insensitive) match of tokens against tags, name and lineage
    ///
    /// with `all` every token must match, otherwise any one is enough. an empty
    /// list passes with `all` and fails without it.
    pub fn has_string_filter<S: AsRef<str>>(&self, tokens: &[S], all: bool) -> bool {
        if all {
            tokens.iter().all(|t| self.matches_string(t.as_ref()))
        } else {
            tokens.iter().any(|t| self.matches_string(t.as_ref()))
        }
    }

    /// substring (case-insensitive) match of any token against name, lineage or tags
    pub fn contains_string_filter<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        tokens.iter().map(AsRef::as_ref).any(|token| {
            icontains(self.name, token)
                || self.ids.iter().any(|id| id.contains(token))
                || self.keywords.keys().any(|keyword| icontains(keyword, token))
        })
    }

    /// whether the character satisfies a single form reference
    pub fn has_form(&self, form: &Form) -> bool {
        self.has_form_in(form, &mut ListWalk::default())
    }

    fn has_form_in(&self, form: &Form, walk: &mut ListWalk) -> bool {
        let npc = self.npc;
        match &form.kind {
            FormKind::CombatStyle => npc.combat_style == Some(form.id),
            FormKind::Class => npc.class == Some(form.id),
            FormKind::Faction => npc.is_in_faction(form.id),
            FormKind::Race(_) => self.race.is_some_and(|race| race.id == form.id),
            FormKind::Outfit => npc.outfit == Some(form.id),
            FormKind::Npc(_) => npc.id() == form.id || self.ids.iter().any(|id| *id == form.id),
            FormKind::VoiceType => npc.voice_type == Some(form.id),
            FormKind::Spell => npc.has_spell(form.id),
            FormKind::Armor => npc.skin == Some(form.id),
            FormKind::Location => self.actor.editor_location == Some(form.id),
            FormKind::Perk => self.perk_rank(form.id) > 0,
            FormKind::FormList(list) => self.list_has_form(form.id, list, walk),
            FormKind::Keyword | FormKind::Other => false,
        }
    }

    /// any entry of the list (recursively) satisfies the dispatch
    fn list_has_form(&self, list_id: FormId, list: &FormList, walk: &mut ListWalk) -> bool {
        let depth = walk.path.len();
        if walk.path.contains(&list_id) {
            tracing::warn!(list = %list_id, "form list contains itself, ignoring cyclic branch");
            return false;
        }
        if depth >= self.max_list_depth {
            tracing::warn!(
                list = %list_id,
                depth,
                "form list nesting too deep, ignoring branch"
            );
            return false;
        }
        // an earlier expansion at this depth or shallower already came back false
        if walk.expanded.get(&list_id).is_some_and(|&seen| seen <= depth) {
            return false;
        }
        walk.expanded.insert(list_id, depth);

        walk.path.push(list_id);
        let result = list.forms.iter().any(|entry| match self.db.form(*entry) {
            Some(form) => self.has_form_in(form, walk),
            None => {
                tracing::debug!(list = %list_id, entry = %entry, "skipping unresolved list entry");
                false
            }
        });
        walk.path.pop();

        result
    }

    fn has_form_or_plugin(&self, entry: &FormOrPlugin<'_>) -> bool {
        match entry {
            FormOrPlugin::Form(form) => self.has_form(form),
            FormOrPlugin::Plugin(plugin) => self.ids.iter().any(|id| id.is_in_plugin(plugin)),
        }
    }

    /// match form/plugin entries with the same all/any rules as string filters
    pub fn has_form_filter(&self, entries: &[FormOrPlugin<'_>], all: bool) -> bool {
        if all {
            entries.iter().all(|e| self.has_form_or_plugin(e))
        } else {
            entries.iter().any(|e| self.has_form_or_plugin(e))
        }
    }

    /// whether the character already has something mutually exclusive with `form`
    ///
    /// excluded keywords are checked against the tag set, everything else goes
    /// through [`Snapshot::has_form`].
    pub fn has_mutually_exclusive_form(&self, form: &Form, groups: &dyn ExclusiveGroups) -> bool {
        let excluded = groups.mutually_exclusive_forms_for_form(form.id);
        if excluded.is_empty() {
            return false;
        }

        excluded
            .iter()
            .filter_map(|id| self.db.form(*id))
            .any(|other| match other.kind {
                FormKind::Keyword => self.has_keyword_string(&other.editor_id),
                _ => self.has_form(other),
            })
    }
}
