mod schema;

pub use schema::{
    Config, ExclusiveGroupConfig, Settings, DEFAULT_CHILD_RACE_MARKER, DEFAULT_FUZZY_THRESHOLD,
    DEFAULT_MAX_LIST_DEPTH,
};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::forms::{FormDatabase, FormId};

const CONFIG_ENV_VAR: &str = "NPC_LOOKUP_CONFIG";

/// config path from the environment, if one is set
pub fn get_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)
}

/// load config from `NPC_LOOKUP_CONFIG`, falling back to defaults when unset
pub fn load_from_env() -> Result<Config> {
    match get_config_path() {
        Some(path) => load(&path),
        None => Ok(Config::default()),
    }
}

/// load a JSON5 config file
pub fn load(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn parse(content: &str) -> Result<Config> {
    let config: Config = json5::from_str(content)?;
    Ok(config)
}

/// write a config as pretty JSON, creating parent directories
pub fn save(path: &Path, config: &Config) -> Result<()> {
    // ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Verify a config against a form database and return a list of errors
pub fn verify(config: &Config, db: &FormDatabase) -> Vec<String> {
    let mut errors = Vec::new();

    if config.settings.max_list_depth == 0 {
        errors.push("settings.max_list_depth: must be at least 1".to_string());
    }

    if config.settings.child_race_marker.is_empty() {
        errors.push("settings.child_race_marker: must not be empty".to_string());
    }

    for (i, group) in config.exclusive_groups.iter().enumerate() {
        let prefix = format!("exclusive_groups[{}]", i);

        if group.name.trim().is_empty() {
            errors.push(format!("{}: group name must not be empty", prefix));
        }

        if group.forms.len() < 2 {
            errors.push(format!(
                "{} ('{}'): a group needs at least two members",
                prefix, group.name
            ));
        }

        for token in &group.forms {
            if let Err(e) = resolve_group_member(db, token, config.settings.fuzzy_threshold) {
                errors.push(format!("{}: {}", prefix, e));
            }
        }
    }

    errors
}

/// resolve an exclusive group member token to a form id
pub(crate) fn resolve_group_member(
    db: &FormDatabase,
    token: &str,
    fuzzy_threshold: usize,
) -> Result<FormId> {
    if let Some(id) = FormId::parse_prefixed(token) {
        return db
            .form(id)
            .map(|f| f.id)
            .ok_or_else(|| anyhow!("form {} not found", id));
    }

    Ok(db.lookup_editor_id(token, fuzzy_threshold)?.id)
}
