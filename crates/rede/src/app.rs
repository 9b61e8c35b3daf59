//! Application context for CLI command execution.
//!
//! [`App`] locates the repository, loads configuration and the data files,
//! and hands out freshly built genealogies.
//!
//! # Example
//!
//! ```no_run
//! use rede::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     let genealogy = app.genealogy().await?;
//!     println!("{} members", genealogy.len());
//!     Ok(())
//! }
//! ```

use crate::config::{CONFIG_FILE_NAME, REDE_DIR_NAME, RedeConfig, find_rede_root};
use crate::error::{ConfigError, Result};
use crate::genealogy::Genealogy;
use crate::storage::{ContactStore, JsonlContactStore, LoadWarning};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    store: JsonlContactStore,
    config: RedeConfig,
    root_dir: PathBuf,
    load_warnings: Vec<LoadWarning>,
}

impl App {
    /// Create an App from `working_dir` or the nearest parent repository.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository is found, the configuration is
    /// invalid, or a data file cannot be read.
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_rede_root(working_dir).ok_or(ConfigError::NotInitialized)?;
        let config_path = root_dir.join(REDE_DIR_NAME).join(CONFIG_FILE_NAME);
        let config = RedeConfig::load(&config_path).await?;

        let (contacts_path, cells_path) = config.data_paths(&root_dir);
        let (store, load_warnings) = JsonlContactStore::load(&contacts_path, &cells_path).await?;

        Ok(Self {
            store,
            config,
            root_dir,
            load_warnings,
        })
    }

    /// Build the genealogy from the current records.
    pub async fn genealogy(&self) -> Result<Genealogy> {
        let contacts = self.store.contacts().await?;
        let cells = self.store.cells().await?;
        Genealogy::build(&contacts, &cells)
    }

    /// The contact store.
    pub fn store(&self) -> &JsonlContactStore {
        &self.store
    }

    /// The contact store, mutably.
    pub fn store_mut(&mut self) -> &mut JsonlContactStore {
        &mut self.store
    }

    /// Loaded configuration.
    pub fn config(&self) -> &RedeConfig {
        &self.config
    }

    /// Directory containing `.rede/`.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Problems found while loading the data files.
    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.load_warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init;
    use tempfile::TempDir;

    #[tokio::test]
    async fn app_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path()).await.unwrap();
        tokio::fs::write(
            temp_dir.path().join(".rede/contacts.jsonl"),
            "{\"id\":\"a\",\"name\":\"Ana\"}\n{\"id\":\"b\",\"name\":\"Bia\",\"referred_by\":\"a\"}\n",
        )
        .await
        .unwrap();
        let sub_dir = temp_dir.path().join("reports");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let app = App::from_directory(&sub_dir).await.unwrap();
        let genealogy = app.genealogy().await.unwrap();

        assert_eq!(app.root_dir(), temp_dir.path());
        assert_eq!(genealogy.len(), 2);
        assert!(app.load_warnings().is_empty());
    }

    #[tokio::test]
    async fn app_from_uninitialized_directory() {
        let temp_dir = TempDir::new().unwrap();

        let err = App::from_directory(temp_dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("Not a rede repository"));
    }
}
