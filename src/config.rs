use crate::autolink::{AutoLinkMode, DEFAULT_PATH_PREFIX, EntityTable, is_valid_path_prefix};
use crate::content::{FormatHint, RenderOptions};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Top-level configuration loaded from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub content: ContentConfig,
    pub autolink: AutoLinkConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub format: FormatHint,
    pub wrap_container: bool,
}

#[derive(Debug, Deserialize)]
pub struct AutoLinkConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub mode: AutoLinkMode,
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    /// JSON entity table, relative paths resolve against the config file
    pub entities: Option<PathBuf>,
}

impl Default for AutoLinkConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            mode: AutoLinkMode::default(),
            path_prefix: default_path_prefix(),
            entities: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}
fn default_path_prefix() -> String {
    DEFAULT_PATH_PREFIX.into()
}

impl RenderConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.content.format,
            autolink: self.autolink.enabled,
            mode: self.autolink.mode,
            path_prefix: self.autolink.path_prefix.clone(),
        }
    }

    /// Load the configured entity table, or an empty one when none is set.
    pub fn load_entities(&self) -> Result<EntityTable> {
        match &self.autolink.entities {
            Some(path) => load_entities(path),
            None => Ok(EntityTable::default()),
        }
    }
}

/// Parse and validate a TOML document.
pub fn from_toml(content: &str) -> Result<RenderConfig> {
    let config: RenderConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from `path`.
pub fn load(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut config = from_toml(&content)?;

    let base = path.parent().unwrap_or(Path::new("."));
    config.autolink.entities = config.autolink.entities.take().map(|entities| {
        if entities.is_relative() {
            base.join(entities)
        } else {
            entities
        }
    });

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load configuration from `path` if given, zero-config defaults otherwise.
pub fn load_or_default(path: Option<&Path>) -> Result<RenderConfig> {
    match path {
        Some(path) => load(path),
        None => {
            info!("no config file given, using defaults");
            Ok(RenderConfig::default())
        }
    }
}

/// Read a JSON entity table from disk.
pub fn load_entities(path: &Path) -> Result<EntityTable> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let table = EntityTable::from_json(&content)?;
    info!("loaded {} entities from {}", table.len(), path.display());
    Ok(table)
}

fn validate(config: &RenderConfig) -> Result<()> {
    if !is_valid_path_prefix(&config.autolink.path_prefix) {
        return Err(Error::InvalidConfig(format!(
            "autolink.path_prefix must be a site path starting with a single '/' \
             and without quotes or angle brackets, got {:?}",
            config.autolink.path_prefix
        )));
    }
    Ok(())
}
