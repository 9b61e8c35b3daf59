//! Rede - member genealogy for community cells.
//!
//! Builds a referral network from flat contact records: who referred whom,
//! how deep each member sits, and who is on standby. The same crate ships
//! the `rede` CLI over JSONL data files.

#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod genealogy;
pub mod storage;

pub mod edit;

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
