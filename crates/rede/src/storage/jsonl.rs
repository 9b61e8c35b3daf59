//! JSONL-backed contact store.
//!
//! Contacts and cells live in two JSON Lines files. Loading is resilient:
//! bad lines and invalid records are skipped and reported as
//! [`LoadWarning`]s so one corrupt line never hides the whole community.
//! Skipped contact lines are written back verbatim, in place, whenever the
//! contacts file is rewritten.

use super::{ContactStore, InMemoryContactStore};
use crate::domain::{CellRecord, ContactId, ContactRecord, ContactUpdate};
use crate::error::{Error, Result};
use async_trait::async_trait;
use rede_jsonl::{
    Warning as JsonlWarning, read_jsonl_lines_resilient, read_jsonl_resilient, write_lines_atomic,
};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Non-fatal problems found while loading the data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A line could not be parsed as a record.
    ///
    /// **Effect**: the line is skipped.
    MalformedJson {
        /// File the line came from
        file: PathBuf,
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// A contact parsed but was rejected: blank id or name, or an ID
    /// already used by an earlier line.
    ///
    /// **Effect**: the line is skipped; for duplicates the first one wins.
    SkippedLine {
        /// File the line came from
        file: PathBuf,
        /// 1-based line number
        line_number: usize,
        /// Why it was skipped
        reason: String,
    },
}

impl LoadWarning {
    /// 1-based line number of the skipped line.
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson {
                file,
                line_number,
                error,
            } => write!(f, "{}:{}: skipped malformed line: {}", file.display(), line_number, error),
            Self::SkippedLine {
                file,
                line_number,
                reason,
            } => write!(f, "{}:{}: skipped: {}", file.display(), line_number, reason),
        }
    }
}

/// Contact store persisted as two JSONL files.
#[derive(Debug, Clone)]
pub struct JsonlContactStore {
    inner: InMemoryContactStore,
    contacts_path: PathBuf,
    cells_path: PathBuf,
    /// Source line of each loaded contact, parallel to `inner`'s contacts.
    contact_lines: Vec<usize>,
    /// Contact lines that were skipped at load, kept for rewrites.
    skipped: Vec<JsonlWarning>,
}

impl JsonlContactStore {
    /// Load both files.
    ///
    /// # Errors
    ///
    /// Fails only if a file cannot be opened or read; content problems are
    /// returned as warnings.
    pub async fn load(contacts_path: &Path, cells_path: &Path) -> Result<(Self, Vec<LoadWarning>)> {
        let (lines, mut skipped) =
            read_jsonl_lines_resilient::<ContactRecord, _>(contacts_path).await?;

        let mut seen = HashSet::new();
        let mut contacts = Vec::with_capacity(lines.len());
        let mut contact_lines = Vec::with_capacity(lines.len());
        for line in lines {
            let rejection = match line.value.validate() {
                Err(error) => Some(error),
                Ok(()) if !seen.insert(line.value.id.clone()) => Some(format!(
                    "duplicate contact {}: first record kept",
                    line.value.id
                )),
                Ok(()) => None,
            };
            match rejection {
                Some(reason) => skipped.push(JsonlWarning::SkippedLine {
                    line_number: line.number,
                    reason,
                    content: line.content,
                }),
                None => {
                    contact_lines.push(line.number);
                    contacts.push(line.value);
                }
            }
        }
        skipped.sort_by_key(JsonlWarning::line_number);

        let (cells, cell_warnings) = read_jsonl_resilient::<CellRecord, _>(cells_path).await?;

        let mut warnings: Vec<LoadWarning> = convert_warnings(contacts_path, &skipped).collect();
        warnings.extend(convert_warnings(cells_path, &cell_warnings));

        for warning in &warnings {
            tracing::warn!(%warning, "Data file warning");
        }
        tracing::debug!(
            contacts = contacts.len(),
            cells = cells.len(),
            warnings = warnings.len(),
            "Loaded contact store"
        );

        let store = Self {
            inner: InMemoryContactStore::new(contacts, cells),
            contacts_path: contacts_path.to_path_buf(),
            cells_path: cells_path.to_path_buf(),
            contact_lines,
            skipped,
        };
        Ok((store, warnings))
    }

    /// Path of the contacts file.
    pub fn contacts_path(&self) -> &Path {
        &self.contacts_path
    }

    /// Path of the cells file.
    pub fn cells_path(&self) -> &Path {
        &self.cells_path
    }

    /// Contacts and skipped lines merged back into source order.
    fn file_lines(&self, contacts: &[ContactRecord]) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(contacts.len() + self.skipped.len());
        for (&number, contact) in self.contact_lines.iter().zip(contacts) {
            lines.push((number, serde_json::to_string(contact)?));
        }
        lines.extend(
            self.skipped
                .iter()
                .map(|warning| (warning.line_number(), warning.content().to_string())),
        );
        lines.sort_by_key(|(number, _)| *number);
        Ok(lines.into_iter().map(|(_, line)| line).collect())
    }
}

fn convert_warnings<'a>(
    file: &'a Path,
    warnings: &'a [JsonlWarning],
) -> impl Iterator<Item = LoadWarning> + 'a {
    warnings.iter().map(move |warning| match warning {
        JsonlWarning::MalformedJson {
            line_number,
            error,
            ..
        } => LoadWarning::MalformedJson {
            file: file.to_path_buf(),
            line_number: *line_number,
            error: error.clone(),
        },
        JsonlWarning::SkippedLine {
            line_number,
            reason,
            ..
        } => LoadWarning::SkippedLine {
            file: file.to_path_buf(),
            line_number: *line_number,
            reason: reason.clone(),
        },
    })
}

#[async_trait]
impl ContactStore for JsonlContactStore {
    async fn contacts(&self) -> Result<Vec<ContactRecord>> {
        self.inner.contacts().await
    }

    async fn cells(&self) -> Result<Vec<CellRecord>> {
        self.inner.cells().await
    }

    /// Applies the update to a copy, writes the file, then swaps the copy in.
    async fn update_contact(
        &mut self,
        id: &ContactId,
        update: ContactUpdate,
    ) -> Result<ContactRecord> {
        let mut next = self.inner.clone();
        let updated = next.apply_update(id, update)?;

        let lines = self.file_lines(next.contact_slice())?;
        write_lines_atomic(&self.contacts_path, &lines)
            .await
            .map_err(|e| {
                Error::Storage(format!("failed to write {}: {}", self.contacts_path.display(), e))
            })?;
        self.inner = next;
        Ok(updated)
    }
}
