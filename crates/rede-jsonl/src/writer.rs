//! JSONL writing operations.

use crate::Result;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Async writer producing one JSON object per line.
///
/// Output is buffered; call [`flush`](Self::flush) before dropping the writer.
pub struct JsonlWriter<W> {
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> JsonlWriter<W> {
    /// Creates a new `JsonlWriter` wrapping the given async writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Serializes `value` as a single line.
    ///
    /// # Errors
    ///
    /// Fails if serialization or the underlying write fails.
    pub async fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        Ok(())
    }

    /// Writes already-encoded text as a single line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`](crate::Error::InvalidFormat) if
    /// `line` contains a line break, or an IO error if the write fails.
    pub async fn write_raw(&mut self, line: &str) -> Result<()> {
        if line.contains(['\n', '\r']) {
            return Err(crate::Error::InvalidFormat(
                "raw line contains a line break".to_string(),
            ));
        }
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    /// Writes every value from the iterator, one per line.
    ///
    /// # Errors
    ///
    /// Stops at the first serialization or IO failure.
    pub async fn write_all<T, I>(&mut self, values: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.write(&value).await?;
        }
        Ok(())
    }

    /// Flushes buffered output to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying buffered writer.
    ///
    /// This does not flush.
    #[must_use]
    pub fn into_inner(self) -> BufWriter<W> {
        self.writer
    }
}
