//! Warning types for non-fatal errors during JSONL processing.
//!
//! A [`Warning`] records a line that was skipped so that loading can continue
//! past corrupt or hand-edited data. The line's text travels with the warning
//! so a later rewrite of the file can put it back untouched.

use std::fmt;

/// A non-fatal warning that occurred during JSONL processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A line contained malformed JSON, or JSON of the wrong shape.
    MalformedJson {
        /// The 1-based line number where the error occurred.
        line_number: usize,
        /// A description of the JSON parsing error.
        error: String,
        /// The line as written, without surrounding whitespace.
        content: String,
    },

    /// A line parsed but was rejected by a later validation step.
    SkippedLine {
        /// The 1-based line number that was skipped.
        line_number: usize,
        /// The reason the line was skipped.
        reason: String,
        /// The line as written, without surrounding whitespace.
        content: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use rede_jsonl::Warning;
    ///
    /// let warning = Warning::MalformedJson {
    ///     line_number: 42,
    ///     error: "unexpected token".to_string(),
    ///     content: "{\"id\":".to_string(),
    /// };
    /// assert_eq!(warning.line_number(), 42);
    /// ```
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns the text of the skipped line.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::MalformedJson { content, .. } | Self::SkippedLine { content, .. } => content,
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson {
                line_number,
                error,
                ..
            } => write!(f, "line {}: malformed JSON: {}", line_number, error),
            Self::SkippedLine {
                line_number,
                reason,
                ..
            } => write!(f, "line {}: skipped: {}", line_number, reason),
        }
    }
}

impl std::error::Error for Warning {}
