//! plugin files (provenance units)

use serde::{Deserialize, Serialize};

use super::FormId;

/// load index shared by every light plugin
pub const LIGHT_PLUGIN_INDEX: u8 = 0xFE;

/// a content file that defines forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginFile {
    /// file name, e.g. "Skyrim.esm"
    pub name: String,
    /// load index (`0xFE` for light plugins)
    pub compile_index: u8,
    /// light plugin index, only set for light plugins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_file_compile_index: Option<u16>,
}

impl PluginFile {
    pub fn regular(name: impl Into<String>, compile_index: u8) -> Self {
        Self {
            name: name.into(),
            compile_index,
            small_file_compile_index: None,
        }
    }

    pub fn light(name: impl Into<String>, small_file_compile_index: u16) -> Self {
        Self {
            name: name.into(),
            compile_index: LIGHT_PLUGIN_INDEX,
            small_file_compile_index: Some(small_file_compile_index),
        }
    }

    pub fn is_light(&self) -> bool {
        self.compile_index == LIGHT_PLUGIN_INDEX && self.small_file_compile_index.is_some()
    }

    /// whether this plugin's id range covers the given form id
    pub fn is_form_in_plugin(&self, id: FormId) -> bool {
        if id.plugin_index() != self.compile_index {
            return false;
        }

        if self.compile_index != LIGHT_PLUGIN_INDEX {
            return true;
        }

        // the light range is only owned by a plugin with a light index
        self.small_file_compile_index
            .is_some_and(|light| id.light_index() == light)
    }
}
