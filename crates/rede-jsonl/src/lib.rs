//! JSON Lines support for rede data files.
//!
//! Contact and cell records are stored one JSON object per line. This crate
//! reads such files resiliently (malformed lines become [`Warning`]s instead
//! of aborting the load) and writes them atomically.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_lines_atomic};
pub use error::{Error, Result};
pub use reader::{JsonlReader, Line, read_jsonl_lines_resilient, read_jsonl_resilient};
pub use warning::Warning;
pub use writer::JsonlWriter;
