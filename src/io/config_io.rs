use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::KanbanConfig;

/// Error type for config file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not encode config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not write config {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Read kanban.toml. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<KanbanConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(KanbanConfig::default()),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(toml::from_str(&text)?)
}

pub fn write_config(path: &Path, config: &KanbanConfig) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)?;
    fs::write(path, text).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
