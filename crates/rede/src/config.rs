//! Configuration for a rede repository.
//!
//! A repository is a directory containing `.rede/config.yaml` plus the two
//! data files it points to. Paths in the config are relative to the
//! directory that holds `.rede/`.

use crate::error::{ConfigError, Result};
use crate::genealogy::LayoutConfig;
use crate::genealogy::view::DEFAULT_LEVELS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the rede directory
pub const REDE_DIR_NAME: &str = ".rede";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the contacts data file
pub const CONTACTS_FILE_NAME: &str = "contacts.jsonl";

/// Name of the cells data file
pub const CELLS_FILE_NAME: &str = "cells.jsonl";

/// Maximum directory depth to traverse when searching for the rede root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RedeConfig {
    /// Contacts file, relative to the repository root
    pub contacts_file: String,

    /// Cells file, relative to the repository root
    pub cells_file: String,

    /// Layout spacing
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Levels shown by `rede view` when `--levels` is not given
    #[serde(default = "default_levels")]
    pub default_levels: Vec<usize>,
}

fn default_levels() -> Vec<usize> {
    DEFAULT_LEVELS.to_vec()
}

impl Default for RedeConfig {
    fn default() -> Self {
        Self {
            contacts_file: format!("{}/{}", REDE_DIR_NAME, CONTACTS_FILE_NAME),
            cells_file: format!("{}/{}", REDE_DIR_NAME, CELLS_FILE_NAME),
            layout: LayoutConfig::default(),
            default_levels: default_levels(),
        }
    }
}

impl RedeConfig {
    /// Load and validate configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("YAML error: {}", e)))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Reject spacing values that would produce a degenerate layout.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let layout = &self.layout;
        let spacings = [
            ("sibling-spacing", layout.sibling_spacing),
            ("level-spacing", layout.level_spacing),
        ];
        for (name, value) in spacings {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Parse(format!(
                    "layout.{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !layout.base_y.is_finite() || !layout.depth_indent.is_finite() {
            return Err(ConfigError::Parse(
                "layout.base-y and layout.depth-indent must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute paths of the contacts and cells files under `root`.
    pub fn data_paths(&self, root: &Path) -> (PathBuf, PathBuf) {
        (root.join(&self.contacts_file), root.join(&self.cells_file))
    }
}

/// Find the repository root by searching up the directory tree.
///
/// Returns the directory containing `.rede/`, or `None` if none is found
/// within [`MAX_TRAVERSAL_DEPTH`] levels.
pub fn find_rede_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(REDE_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
