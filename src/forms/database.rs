//! in-memory form database
//!
//! owns every form, actor and plugin record. lookups by editor id and plugin
//! name are case-insensitive.

use std::collections::HashMap;
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strsim::levenshtein;
use thiserror::Error;

use super::{Actor, Form, FormId, Npc, PluginFile};

/// maximum number of "did you mean" suggestions attached to lookup errors
const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to read form dump {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse form dump: {0}")]
    Parse(#[from] json5::Error),

    #[error("duplicate form id {0}")]
    DuplicateForm(FormId),

    #[error("duplicate editor id '{editor_id}' on {existing} and {duplicate}")]
    DuplicateEditorId {
        editor_id: String,
        existing: FormId,
        duplicate: FormId,
    },

    #[error("duplicate actor id {0}")]
    DuplicateActor(FormId),

    #[error("duplicate plugin '{0}'")]
    DuplicatePlugin(String),

    #[error("{owner} references missing form {missing} in '{field}'")]
    Dangling {
        owner: FormId,
        field: &'static str,
        missing: FormId,
    },

    #[error("unknown editor id '{editor_id}'{}", format_suggestions(.suggestions))]
    UnknownEditorId {
        editor_id: String,
        suggestions: Vec<String>,
    },

    #[error("unknown plugin '{0}'")]
    UnknownPlugin(String),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {})", suggestions.join(", "))
    }
}

/// on-disk layout of a form dump
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDump {
    #[serde(default)]
    pub plugins: Vec<PluginFile>,
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub actors: Vec<Actor>,
}

/// borrowed view of a form known to carry npc data
#[derive(Debug, Clone, Copy)]
pub struct NpcHandle<'a> {
    form: &'a Form,
    npc: &'a Npc,
}

impl<'a> NpcHandle<'a> {
    pub fn new(form: &'a Form) -> Option<Self> {
        form.as_npc().map(|npc| Self { form, npc })
    }

    pub fn form(&self) -> &'a Form {
        self.form
    }

    pub fn data(&self) -> &'a Npc {
        self.npc
    }

    pub fn id(&self) -> FormId {
        self.form.id
    }
}

impl Deref for NpcHandle<'_> {
    type Target = Npc;

    fn deref(&self) -> &Self::Target {
        self.npc
    }
}

#[derive(Debug, Default)]
pub struct FormDatabase {
    forms: HashMap<FormId, Form>,
    editor_ids: HashMap<String, FormId>,
    actors: HashMap<FormId, Actor>,
    plugins: Vec<PluginFile>,
}

impl FormDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// build a database from an already-deserialized dump
    pub fn from_dump(dump: FormDump) -> Result<Self, DatabaseError> {
        let mut db = Self::new();
        for plugin in dump.plugins {
            db.insert_plugin(plugin)?;
        }
        for form in dump.forms {
            db.insert_form(form)?;
        }
        for actor in dump.actors {
            db.insert_actor(actor)?;
        }
        Ok(db)
    }

    /// parse a JSON5 form dump
    pub fn from_json5(content: &str) -> Result<Self, DatabaseError> {
        let dump: FormDump = json5::from_str(content)?;
        Self::from_dump(dump)
    }

    /// read and parse a JSON5 form dump from disk
    pub fn load(path: &Path) -> Result<Self, DatabaseError> {
        let content = fs::read_to_string(path).map_err(|source| DatabaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self::from_json5(&content)?;

        tracing::debug!(
            path = %path.display(),
            forms = db.forms.len(),
            actors = db.actors.len(),
            plugins = db.plugins.len(),
            "loaded form dump"
        );

        Ok(db)
    }

    pub fn insert_form(&mut self, form: Form) -> Result<(), DatabaseError> {
        if self.forms.contains_key(&form.id) {
            return Err(DatabaseError::DuplicateForm(form.id));
        }

        if !form.editor_id.is_empty() {
            let key = form.editor_id.to_lowercase();
            if let Some(&existing) = self.editor_ids.get(&key) {
                return Err(DatabaseError::DuplicateEditorId {
                    editor_id: form.editor_id,
                    existing,
                    duplicate: form.id,
                });
            }
            self.editor_ids.insert(key, form.id);
        }
        self.forms.insert(form.id, form);
        Ok(())
    }

    pub fn insert_actor(&mut self, actor: Actor) -> Result<(), DatabaseError> {
        if self.actors.contains_key(&actor.id) {
            return Err(DatabaseError::DuplicateActor(actor.id));
        }
        self.actors.insert(actor.id, actor);
        Ok(())
    }

    pub fn insert_plugin(&mut self, plugin: PluginFile) -> Result<(), DatabaseError> {
        if self.plugin(&plugin.name).is_some() {
            return Err(DatabaseError::DuplicatePlugin(plugin.name));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn form(&self, id: FormId) -> Option<&Form> {
        self.forms.get(&id)
    }

    pub fn actor(&self, id: FormId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn npc(&self, id: FormId) -> Option<NpcHandle<'_>> {
        self.form(id).and_then(NpcHandle::new)
    }

    pub fn plugins(&self) -> &[PluginFile] {
        &self.plugins
    }

    pub fn plugin(&self, name: &str) -> Option<&PluginFile> {
        self.plugins
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// plugin whose id range covers the given form
    pub fn plugin_for_form(&self, id: FormId) -> Option<&PluginFile> {
        self.plugins.iter().find(|p| p.is_form_in_plugin(id))
    }

    pub fn find_editor_id(&self, editor_id: &str) -> Option<&Form> {
        self.editor_ids
            .get(&editor_id.to_lowercase())
            .and_then(|id| self.forms.get(id))
    }

    /// look up a form by editor id, suggesting near misses on failure
    pub fn lookup_editor_id(
        &self,
        editor_id: &str,
        fuzzy_threshold: usize,
    ) -> Result<&Form, DatabaseError> {
        if let Some(form) = self.find_editor_id(editor_id) {
            return Ok(form);
        }

        let query = editor_id.to_lowercase();
        let mut candidates: Vec<_> = self
            .forms
            .values()
            .filter(|f| !f.editor_id.is_empty())
            .map(|f| (levenshtein(&query, &f.editor_id.to_lowercase()), &f.editor_id))
            .filter(|(distance, _)| *distance <= fuzzy_threshold)
            .collect();

        candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        Err(DatabaseError::UnknownEditorId {
            editor_id: editor_id.to_string(),
            suggestions: candidates
                .into_iter()
                .take(MAX_SUGGESTIONS)
                .map(|(_, name)| name.clone())
                .collect(),
        })
    }

    pub fn lookup_plugin(&self, name: &str) -> Result<&PluginFile, DatabaseError> {
        self.plugin(name)
            .ok_or_else(|| DatabaseError::UnknownPlugin(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// check every reference in the database and return the dangling ones
    pub fn validate(&self) -> Vec<DatabaseError> {
        let mut errors = Vec::new();

        let mut check = |owner: FormId, refs: Vec<(&'static str, FormId)>| {
            for (field, missing) in refs {
                if !self.forms.contains_key(&missing) {
                    errors.push(DatabaseError::Dangling {
                        owner,
                        field,
                        missing,
                    });
                }
            }
        };

        let mut forms: Vec<_> = self.forms.values().collect();
        forms.sort_by_key(|f| f.id);
        for form in forms {
            check(form.id, form.references());
        }

        let mut actors: Vec<_> = self.actors.values().collect();
        actors.sort_by_key(|a| a.id);
        for actor in actors {
            check(actor.id, actor.references());
        }

        errors
    }
}
