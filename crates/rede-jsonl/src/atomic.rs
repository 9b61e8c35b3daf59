//! Atomic write operations for JSONL files.
//!
//! Data is written to a sibling `.tmp` file, flushed, and then renamed over
//! the target. A crash mid-write leaves the original file intact.

use crate::{JsonlWriter, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Atomically replaces the file at `path` with `values`, one per line.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, if a
/// value fails to serialize, or if the final rename fails. On failure the
/// original file is left unchanged and the temporary file is removed on a
/// best-effort basis.
///
/// # Examples
///
/// ```no_run
/// use rede_jsonl::write_jsonl_atomic;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rows = vec![serde_json::json!({"id": "c-1", "name": "Ana"})];
/// write_jsonl_atomic("contacts.jsonl", &rows).await?;
/// # Ok(())
/// # }
/// ```
pub async fn write_jsonl_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let lines = values
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    write_lines_atomic(path, &lines).await
}

/// Atomically replaces the file at `path` with already-encoded lines.
///
/// Lines are written verbatim, so text that did not parse can be carried
/// through a rewrite.
///
/// # Errors
///
/// Same as [`write_jsonl_atomic`], and a line containing a line break is
/// rejected.
pub async fn write_lines_atomic<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    if let Err(e) = write_to_temp_file(&temp_path, lines).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    tokio::fs::rename(&temp_path, path).await?;
    tracing::debug!(path = %path.display(), lines = lines.len(), "Wrote JSONL file");
    Ok(())
}

/// Appends `.tmp` to the file name, keeping any existing extension.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

async fn write_to_temp_file(temp_path: &Path, lines: &[String]) -> Result<()> {
    let file = File::create(temp_path).await?;
    let mut writer = JsonlWriter::new(file);
    for line in lines {
        writer.write_raw(line).await?;
    }
    writer.flush().await?;
    Ok(())
}
