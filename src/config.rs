use crate::error::ConfigError;
use crate::graph::Position;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, usually read from `drip.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DripConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Where the editor places inserted steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Shift along the primary axis from the origin step to the new one.
    #[serde(default = "default_primary_offset")]
    pub primary_offset: f64,
    /// Shift along the secondary axis for "no" (+) and "yes" (-) branches.
    #[serde(default = "default_branch_offset")]
    pub branch_offset: f64,
    /// Diagonal shift applied to duplicated steps.
    #[serde(default = "default_duplicate_offset")]
    pub duplicate_offset: f64,
    /// Anchor used when no explicit anchor is given for the first step.
    #[serde(default = "default_first_anchor")]
    pub first_anchor: Position,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            primary_offset: default_primary_offset(),
            branch_offset: default_branch_offset(),
            duplicate_offset: default_duplicate_offset(),
            first_anchor: default_first_anchor(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept. Unbounded when absent.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

fn default_primary_offset() -> f64 {
    400.0
}

fn default_branch_offset() -> f64 {
    150.0
}

fn default_duplicate_offset() -> f64 {
    50.0
}

fn default_first_anchor() -> Position {
    Position::new(100.0, 100.0)
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("flowcharts")
}

impl DripConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
