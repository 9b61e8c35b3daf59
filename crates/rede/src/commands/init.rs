//! Implementation of the `init` command.
//!
//! Creates `.rede/` with a default configuration and empty data files.

use crate::config::{CELLS_FILE_NAME, CONFIG_FILE_NAME, CONTACTS_FILE_NAME, REDE_DIR_NAME, RedeConfig};
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Paths created by [`init`].
#[derive(Debug)]
pub struct InitResult {
    /// The `.rede` directory
    pub rede_dir: PathBuf,
    /// The configuration file
    pub config_file: PathBuf,
    /// The empty contacts file
    pub contacts_file: PathBuf,
    /// The empty cells file
    pub cells_file: PathBuf,
}

/// Initialize a new rede repository in `base_dir`.
///
/// # Errors
///
/// Returns an error if `.rede/` already exists or a file system operation
/// fails.
pub async fn init(base_dir: &Path) -> Result<InitResult> {
    let rede_dir = base_dir.join(REDE_DIR_NAME);

    if rede_dir.exists() {
        return Err(ConfigError::AlreadyInitialized(rede_dir).into());
    }

    fs::create_dir_all(&rede_dir).await?;

    let config_file = rede_dir.join(CONFIG_FILE_NAME);
    RedeConfig::default().save(&config_file).await?;

    let contacts_file = rede_dir.join(CONTACTS_FILE_NAME);
    fs::write(&contacts_file, "").await?;

    let cells_file = rede_dir.join(CELLS_FILE_NAME);
    fs::write(&cells_file, "").await?;

    tracing::info!(path = %rede_dir.display(), "Initialized rede repository");

    Ok(InitResult {
        rede_dir,
        config_file,
        contacts_file,
        cells_file,
    })
}
