// Layered configuration: CLI overrides > YAML file > defaults

use crate::models::Category;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "tasklist.yml";
const DB_FILE: &str = "tasklist.db";

/// Optional settings read from the YAML config file
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    store_path: Option<PathBuf>,
    default_category: Option<Category>,
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub default_category: Option<Category>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file holding the tasks and theme
    pub store_path: PathBuf,
    /// Category used when none is given on add
    pub default_category: Category,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            default_category: Category::default(),
        }
    }
}

impl Config {
    /// Resolve configuration from `overrides` and the config file
    ///
    /// An explicit `--config` path must exist. Without one, the default
    /// location is tried and a missing file counts as empty.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let file = match &overrides.config {
            Some(path) => read_config_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_config_file(&path)?,
                _ => ConfigFile::default(),
            },
        };

        Ok(Self::resolve(overrides, file))
    }

    fn resolve(overrides: &Overrides, file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            store_path: overrides
                .store_path
                .clone()
                .or(file.store_path)
                .unwrap_or(defaults.store_path),
            default_category: overrides
                .default_category
                .or(file.default_category)
                .unwrap_or(defaults.default_category),
        }
    }
}

/// `<config dir>/tasklist/tasklist.yml`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `<data dir>/tasklist/tasklist.db`, or `./.tasklist/tasklist.db` as a fallback
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".tasklist"))
        .join(DB_FILE)
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Err(eyre!("Config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    debug!(path = ?path, "Loaded config file");

    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
