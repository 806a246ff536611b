//! mutually exclusive form groups
//!
//! a group lists forms (or keywords) that must not co-occur on one character.
//! the lookup core only asks one question of this layer: which forms exclude
//! a given form.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{self, Config};
use crate::forms::{FormDatabase, FormId};

/// source of mutual exclusion data consulted by the lookup core
pub trait ExclusiveGroups {
    /// every form mutually exclusive with `form`; empty when none is configured
    fn mutually_exclusive_forms_for_form(&self, form: FormId) -> HashSet<FormId>;
}

/// a named, resolved group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusiveGroup {
    pub name: String,
    pub forms: Vec<FormId>,
}

#[derive(Debug, Default)]
pub struct ExclusiveGroupRegistry {
    groups: Vec<ExclusiveGroup>,
    by_form: HashMap<FormId, Vec<usize>>,
}

impl ExclusiveGroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// resolve the groups declared in config against a form database
    pub fn from_config(config: &Config, db: &FormDatabase) -> Result<Self> {
        let mut registry = Self::new();
        for group in &config.exclusive_groups {
            let forms = group
                .forms
                .iter()
                .map(|token| {
                    config::resolve_group_member(db, token, config.settings.fuzzy_threshold)
                })
                .collect::<Result<Vec<_>>>()?;

            registry.add_group(ExclusiveGroup {
                name: group.name.clone(),
                forms,
            });
        }
        Ok(registry)
    }

    /// add a group; a group with the same name absorbs the new members
    pub fn add_group(&mut self, group: ExclusiveGroup) {
        let index = match self.groups.iter().position(|g| g.name == group.name) {
            Some(index) => {
                let existing = &mut self.groups[index];
                for form in group.forms {
                    if !existing.forms.contains(&form) {
                        existing.forms.push(form);
                    }
                }
                index
            }
            None => {
                self.groups.push(group);
                self.groups.len() - 1
            }
        };

        for form in &self.groups[index].forms {
            let indices = self.by_form.entry(*form).or_default();
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
    }

    pub fn groups(&self) -> &[ExclusiveGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&ExclusiveGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// groups that list the given form
    pub fn groups_for_form(&self, form: FormId) -> impl Iterator<Item = &ExclusiveGroup> {
        self.by_form
            .get(&form)
            .into_iter()
            .flatten()
            .map(|index| &self.groups[*index])
    }
}

impl ExclusiveGroups for ExclusiveGroupRegistry {
    fn mutually_exclusive_forms_for_form(&self, form: FormId) -> HashSet<FormId> {
        self.groups_for_form(form)
            .flat_map(|g| g.forms.iter().copied())
            .filter(|f| *f != form)
            .collect()
    }
}
