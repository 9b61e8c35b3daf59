//! Helpers shared across integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

/// Run the `rede` binary in `dir` with plain, deterministic output.
pub fn run_rede_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rede"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("REDE_ASCII", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute rede binary")
}

/// Overwrite `.rede/contacts.jsonl` with `lines`.
pub fn write_contacts(dir: &Path, lines: &[&str]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(dir.join(".rede/contacts.jsonl"), content).expect("Failed to write contacts");
}

/// Overwrite `.rede/cells.jsonl` with `lines`.
pub fn write_cells(dir: &Path, lines: &[&str]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(dir.join(".rede/cells.jsonl"), content).expect("Failed to write cells");
}

/// Stdout as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
