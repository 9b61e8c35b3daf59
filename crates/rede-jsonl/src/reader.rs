//! JSONL reading operations.
//!
//! Reads line-by-line with line number tracking so that parse failures can be
//! reported against the line a user would see in an editor.

use crate::warning::Warning;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// A record parsed from one line of a JSONL file.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<T> {
    /// 1-based line number.
    pub number: usize,
    /// The line as written, without surrounding whitespace.
    pub content: String,
    /// The parsed record.
    pub value: T,
}

/// Async reader for JSONL (JSON Lines) data.
///
/// `JsonlReader` wraps an async reader and tracks the 1-based number of the
/// last line read. Blank lines are skipped silently.
///
/// # Examples
///
/// ```no_run
/// use rede_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("contacts.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(value) = reader.read_line::<serde_json::Value>().await? {
///     println!("{value}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    reader: BufReader<R>,
    /// Current line number (0 before any lines are read).
    line_number: usize,
    buffer: String,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Returns the line number of the last line read, or 0 before any reads.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next non-blank line as raw text.
    ///
    /// Returns `Ok(None)` at end of input.
    async fn next_raw_line(&mut self) -> Result<Option<&str>> {
        loop {
            self.buffer.clear();
            let read = self.reader.read_line(&mut self.buffer).await?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if !self.buffer.trim().is_empty() {
                return Ok(Some(self.buffer.trim()));
            }
        }
    }

    /// Reads and deserializes the next record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] naming the line number if the line is
    /// not valid JSON for `T`, or [`Error::Io`] if reading fails.
    pub async fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let Some(line) = self.next_raw_line().await? else {
            return Ok(None);
        };
        let parsed = serde_json::from_str::<T>(line);
        parsed.map(Some).map_err(|e| {
            Error::InvalidFormat(format!("line {}: {}", self.line_number, e))
        })
    }

    /// Reads every remaining record, skipping lines that fail to parse.
    ///
    /// Each record keeps its line number and text. Each skipped line produces
    /// a [`Warning::MalformedJson`]. IO errors are still fatal.
    pub async fn read_all_resilient<T: DeserializeOwned>(
        &mut self,
    ) -> Result<(Vec<Line<T>>, Vec<Warning>)> {
        let mut lines = Vec::new();
        let mut warnings = Vec::new();

        while let Some(line) = self.next_raw_line().await? {
            let content = line.to_string();
            match serde_json::from_str::<T>(&content) {
                Ok(value) => lines.push(Line {
                    number: self.line_number,
                    content,
                    value,
                }),
                Err(e) => {
                    tracing::warn!(line = self.line_number, error = %e, "Skipping malformed JSONL line");
                    warnings.push(Warning::MalformedJson {
                        line_number: self.line_number,
                        error: e.to_string(),
                        content,
                    });
                }
            }
        }

        Ok((lines, warnings))
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

/// Reads a whole JSONL file, keeping the line number and text of each record.
///
/// Malformed lines become warnings. A missing file is an error; an empty
/// file yields no records.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub async fn read_jsonl_lines_resilient<T, P>(path: P) -> Result<(Vec<Line<T>>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).await?;
    let mut reader = JsonlReader::new(file);
    let (lines, warnings) = reader.read_all_resilient().await?;

    tracing::debug!(
        path = %path.display(),
        records = lines.len(),
        warnings = warnings.len(),
        "Loaded JSONL file"
    );

    Ok((lines, warnings))
}

/// Reads a whole JSONL file, collecting malformed lines as warnings.
///
/// Like [`read_jsonl_lines_resilient`] but returns only the records.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let (lines, warnings) = read_jsonl_lines_resilient(path).await?;
    Ok((lines.into_iter().map(|line| line.value).collect(), warnings))
}
