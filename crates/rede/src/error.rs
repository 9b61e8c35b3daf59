//! Error types for rede operations.

use crate::domain::ContactId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for rede operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Data file could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// No contact with the given ID exists.
    #[error("Contact not found: {0}")]
    ContactNotFound(ContactId),

    /// Two contact records share an ID.
    #[error("Duplicate contact id: {0}")]
    DuplicateContact(ContactId),

    /// Following referrer links revisited a contact.
    #[error("Referral cycle detected: {}", format_cycle(.path))]
    ReferralCycle {
        /// Contacts along the cycle, ending with the repeated one.
        path: Vec<ContactId>,
    },

    /// A record lacks its ID or name and cannot be edited.
    #[error("Malformed contact record: {0}")]
    MalformedRecord(String),

    /// A required form field is missing or invalid.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The edit session was already submitted successfully.
    #[error("Edit session is closed")]
    SessionClosed,

    /// The photo uploader rejected the file.
    #[error("Photo upload failed: {0}")]
    Upload(String),
}

/// Configuration and repository-layout errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.rede` directory in this directory or any parent.
    #[error("Not a rede repository (or any parent directory). Run 'rede init' first.")]
    NotInitialized,

    /// `rede init` ran where a repository already exists.
    #[error("Rede is already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    /// The config file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(String),
}

impl From<rede_jsonl::Error> for Error {
    fn from(err: rede_jsonl::Error) -> Self {
        match err {
            rede_jsonl::Error::Io(e) => Self::Io(e),
            rede_jsonl::Error::Json(e) => Self::Json(e),
            rede_jsonl::Error::InvalidFormat(msg) => Self::Storage(msg),
        }
    }
}

fn format_cycle(path: &[ContactId]) -> String {
    path.iter()
        .map(ContactId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A specialized Result type for rede operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = Error::ReferralCycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Referral cycle detected: a -> b -> a");
    }

    #[test]
    fn jsonl_io_error_maps_to_io() {
        let err: Error = rede_jsonl::Error::Io(io::Error::other("boom")).into();
        assert!(matches!(err, Error::Io(_)));
    }
}
