//! File-level tests for resilient loading and atomic writes.

use rede_jsonl::{
    Warning, read_jsonl_lines_resilient, read_jsonl_resilient, write_jsonl_atomic,
    write_lines_atomic,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Cell {
    id: String,
    name: String,
    #[serde(default)]
    leader_name: Option<String>,
}

fn cell(id: &str, name: &str) -> Cell {
    Cell {
        id: id.to_string(),
        name: name.to_string(),
        leader_name: None,
    }
}

#[tokio::test]
async fn loads_valid_records_and_reports_bad_lines() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{\"id\":\"c1\",\"name\":\"Alpha\"}}").unwrap();
    writeln!(file, "{{\"id\":\"c2\"").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "{{\"id\":\"c3\",\"name\":\"Gamma\",\"leader_name\":\"Rute\"}}").unwrap();
    writeln!(file, "[1, 2, 3]").unwrap();

    let (cells, warnings) = read_jsonl_resilient::<Cell, _>(file.path()).await.unwrap();

    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0], cell("c1", "Alpha"));
    assert_eq!(cells[1].leader_name.as_deref(), Some("Rute"));

    let lines: Vec<usize> = warnings.iter().map(Warning::line_number).collect();
    assert_eq!(lines, vec![2, 5]);
    assert!(warnings.iter().all(|w| w.kind() == "malformed_json"));
}

#[tokio::test]
async fn empty_file_yields_nothing() {
    let file = NamedTempFile::new().unwrap();
    let (cells, warnings) = read_jsonl_resilient::<Cell, _>(file.path()).await.unwrap();
    assert!(cells.is_empty());
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_jsonl_resilient::<Cell, _>(dir.path().join("absent.jsonl")).await;
    assert!(matches!(result, Err(rede_jsonl::Error::Io(_))));
}

#[tokio::test]
async fn written_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.jsonl");
    let cells = vec![cell("c1", "Alpha"), cell("c2", "Beta")];

    write_jsonl_atomic(&path, &cells).await.unwrap();
    let (loaded, warnings) = read_jsonl_resilient::<Cell, _>(&path).await.unwrap();

    assert_eq!(loaded, cells);
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn skipped_lines_survive_a_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.jsonl");
    tokio::fs::write(&path, "{\"id\":\"c1\",\"name\":\"Alpha\"}\n{\"id\":\"c2\"\n")
        .await
        .unwrap();

    let (lines, warnings) = read_jsonl_lines_resilient::<Cell, _>(&path).await.unwrap();
    assert_eq!(lines[0].number, 1);
    assert_eq!(warnings[0].content(), "{\"id\":\"c2\"");

    let mut renamed = lines[0].value.clone();
    renamed.name = "Alfa".to_string();
    let rewritten = vec![
        serde_json::to_string(&renamed).unwrap(),
        warnings[0].content().to_string(),
    ];
    write_lines_atomic(&path, &rewritten).await.unwrap();

    let (cells, warnings) = read_jsonl_resilient::<Cell, _>(&path).await.unwrap();
    assert_eq!(cells[0].name, "Alfa");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line_number(), 2);
}
