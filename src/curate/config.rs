use crate::error::{CurateError, Result};
use crate::filter::{FilterState, DEFAULT_PAGE_INCREMENT, DEFAULT_PAGE_SIZE};
use crate::schema::{EntityKind, EntityRules, FieldRules};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for curate, stored in .curate/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurateConfig {
    /// Records shown before "load more"
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Records added by each "load more"
    #[serde(default = "default_page_increment")]
    pub page_increment: usize,

    /// Per-kind replacements for the built-in field rules
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<EntityKind, EntityRules>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_increment() -> usize {
    DEFAULT_PAGE_INCREMENT
}

impl Default for CurateConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_increment: DEFAULT_PAGE_INCREMENT,
            rules: BTreeMap::new(),
        }
    }
}

impl CurateConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: CurateConfig = serde_json::from_str(&content)
            .map_err(|e| CurateError::Config(format!("{}: {}", config_path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_increment == 0 {
            return Err(CurateError::Config(
                "page_size and page_increment must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Built-in rules with this config's overrides applied.
    pub fn field_rules(&self) -> FieldRules {
        FieldRules::builtin().merged(&self.rules)
    }

    pub fn filter_state(&self) -> FilterState {
        FilterState::new(self.page_size, self.page_increment)
    }
}
