//! condition evaluator
//!
//! evaluates a condition tree against one character snapshot

use super::types::{Condition, FormMatch};
use crate::config::{Settings, DEFAULT_FUZZY_THRESHOLD};
use crate::exclusive::ExclusiveGroups;
use crate::forms::{FormDatabase, FormId};
use crate::lookup::{FormOrPlugin, Snapshot};

/// context for evaluating conditions
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    /// mutual exclusion data; `exclusive_with` never matches without it
    pub exclusive_groups: Option<&'a dyn ExclusiveGroups>,
    /// edit distance used for suggestions when a token doesn't resolve
    pub fuzzy_threshold: usize,
}

impl Default for EvalContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> EvalContext<'a> {
    pub fn new() -> Self {
        Self {
            exclusive_groups: None,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    /// set the mutual exclusion source
    pub fn with_exclusive_groups(mut self, groups: &'a dyn ExclusiveGroups) -> Self {
        self.exclusive_groups = Some(groups);
        self
    }

    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.fuzzy_threshold = settings.fuzzy_threshold;
        self
    }
}

/// evaluate a condition against a snapshot
pub fn evaluate(condition: &Condition, snapshot: &Snapshot<'_>, ctx: &EvalContext<'_>) -> bool {
    match condition {
        Condition::All(conditions) => {
            // empty All = true (vacuous truth)
            conditions.iter().all(|c| evaluate(c, snapshot, ctx))
        }
        Condition::Any(conditions) => {
            // empty Any = false
            conditions.iter().any(|c| evaluate(c, snapshot, ctx))
        }
        Condition::Not(inner) => !evaluate(inner, snapshot, ctx),
        Condition::Strings(m) => snapshot.has_string_filter(&m.tokens, m.all),
        Condition::Contains(tokens) => snapshot.contains_string_filter(tokens),
        Condition::Forms(m) => evaluate_forms(m, snapshot, ctx),
        Condition::Level(range) => range.contains(snapshot.level()),
        Condition::Child(expected) => snapshot.is_child() == *expected,
        Condition::Leveled(expected) => snapshot.is_leveled() == *expected,
        Condition::ExclusiveWith(token) => evaluate_exclusive(token, snapshot, ctx),
    }
}

fn evaluate_forms(m: &FormMatch, snapshot: &Snapshot<'_>, ctx: &EvalContext<'_>) -> bool {
    let db = snapshot.database();
    let mut entries = Vec::with_capacity(m.entries.len());
    let mut unresolved = false;

    for token in &m.entries {
        match resolve_token(db, token, ctx) {
            Some(entry) => entries.push(entry),
            None => unresolved = true,
        }
    }

    // an unresolved entry can never match
    if m.all && unresolved {
        return false;
    }
    snapshot.has_form_filter(&entries, m.all)
}

fn evaluate_exclusive(token: &str, snapshot: &Snapshot<'_>, ctx: &EvalContext<'_>) -> bool {
    let Some(groups) = ctx.exclusive_groups else {
        return false;
    };

    match resolve_token(snapshot.database(), token, ctx) {
        Some(FormOrPlugin::Form(form)) => snapshot.has_mutually_exclusive_form(form, groups),
        Some(FormOrPlugin::Plugin(plugin)) => {
            tracing::warn!(plugin = %plugin.name, "exclusive_with expects a form, not a plugin");
            false
        }
        None => false,
    }
}

/// resolve a filter token: plugin name, then `0x` form id, then editor id
pub fn resolve_token<'db>(
    db: &'db FormDatabase,
    token: &str,
    ctx: &EvalContext<'_>,
) -> Option<FormOrPlugin<'db>> {
    if let Some(plugin) = db.plugin(token) {
        return Some(FormOrPlugin::Plugin(plugin));
    }

    if let Some(id) = FormId::parse_prefixed(token) {
        let form = db.form(id);
        if form.is_none() {
            tracing::warn!(form = %id, "form id in condition not found");
        }
        return form.map(FormOrPlugin::Form);
    }

    match db.lookup_editor_id(token, ctx.fuzzy_threshold) {
        Ok(form) => Some(FormOrPlugin::Form(form)),
        Err(e) => {
            tracing::warn!(error = %e, "unresolved condition token");
            None
        }
    }
}
