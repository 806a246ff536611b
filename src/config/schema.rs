use serde::{Deserialize, Serialize};

pub const DEFAULT_CHILD_RACE_MARKER: &str = "RaceChild";
pub const DEFAULT_MAX_LIST_DEPTH: usize = 32;
pub const DEFAULT_FUZZY_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub exclusive_groups: Vec<ExclusiveGroupConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// case-sensitive substring marking a race as a child race
    #[serde(default = "default_child_race_marker")]
    pub child_race_marker: String,
    /// deepest form list nesting followed before a branch is dropped
    #[serde(default = "default_max_list_depth")]
    pub max_list_depth: usize,
    /// max edit distance for editor id suggestions
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: usize,
}

fn default_child_race_marker() -> String {
    DEFAULT_CHILD_RACE_MARKER.to_string()
}

fn default_max_list_depth() -> usize {
    DEFAULT_MAX_LIST_DEPTH
}

fn default_fuzzy_threshold() -> usize {
    DEFAULT_FUZZY_THRESHOLD
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            child_race_marker: default_child_race_marker(),
            max_list_depth: DEFAULT_MAX_LIST_DEPTH,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

/// a mutually exclusive group as written in config, members unresolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusiveGroupConfig {
    pub name: String,
    /// editor ids or `0x`-prefixed form ids
    pub forms: Vec<String>,
}
