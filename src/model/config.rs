use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::board::{DEFAULT_BOARD_TITLE, DEFAULT_LIST_OPACITY};

/// Configuration from kanban.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KanbanConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Local JSON document holding the whole board collection
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("simple_board_v2.json")
}

/// Settings for the board seeded on first start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_board_title")]
    pub board_title: String,
    #[serde(default = "default_list_opacity")]
    pub list_opacity: f64,
    #[serde(default = "default_background_image")]
    pub background_image: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            board_title: default_board_title(),
            list_opacity: DEFAULT_LIST_OPACITY,
            background_image: default_background_image(),
        }
    }
}

fn default_board_title() -> String {
    DEFAULT_BOARD_TITLE.to_string()
}

fn default_list_opacity() -> f64 {
    DEFAULT_LIST_OPACITY
}

pub const DEFAULT_BACKGROUND_IMAGE: &str =
    "https://images.unsplash.com/photo-1439405326854-014607f694d7?w=1200&q=80&auto=format&fit=crop";

fn default_background_image() -> Option<String> {
    Some(DEFAULT_BACKGROUND_IMAGE.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive; RUST_LOG wins when set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
