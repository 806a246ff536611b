use std::fmt;

use super::text::{icontains, iequals};
use crate::forms::{Form, FormId, PluginFile};

/// frozen identity of a referenced form: numeric id plus editor id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormIdent {
    form_id: FormId,
    editor_id: String,
}

impl FormIdent {
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    pub fn editor_id(&self) -> &str {
        &self.editor_id
    }

    /// case-insensitive substring match against the editor id
    pub fn contains(&self, needle: &str) -> bool {
        icontains(&self.editor_id, needle)
    }

    /// whether the form was defined by the given plugin
    pub fn is_in_plugin(&self, plugin: &PluginFile) -> bool {
        plugin.is_form_in_plugin(self.form_id)
    }
}

impl From<&Form> for FormIdent {
    fn from(form: &Form) -> Self {
        Self {
            form_id: form.id,
            editor_id: form.editor_id.clone(),
        }
    }
}

impl PartialEq<FormId> for FormIdent {
    fn eq(&self, other: &FormId) -> bool {
        self.form_id == *other
    }
}

/// case-insensitive exact editor id match
impl PartialEq<str> for FormIdent {
    fn eq(&self, other: &str) -> bool {
        iequals(&self.editor_id, other)
    }
}

impl PartialEq<&str> for FormIdent {
    fn eq(&self, other: &&str) -> bool {
        iequals(&self.editor_id, other)
    }
}

impl PartialEq<PluginFile> for FormIdent {
    fn eq(&self, other: &PluginFile) -> bool {
        self.is_in_plugin(other)
    }
}

impl fmt::Display for FormIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.editor_id.is_empty() {
            write!(f, "{}", self.form_id)
        } else {
            write!(f, "{} ({})", self.editor_id, self.form_id)
        }
    }
}
