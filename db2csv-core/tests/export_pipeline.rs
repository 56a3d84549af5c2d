//! End-to-end pipeline tests against the in-memory adapter.
//!
//! These exercise the full export path (query, file creation, coercion,
//! CSV output) without a database server.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use db2csv_core::{
    CellValue, CoercionError, ExportConfig, ExportError, adapters::memory::MemorySession,
    export_with_session,
};
use std::path::Path;

fn config_for(output: &Path) -> ExportConfig {
    ExportConfig::default()
        .with_server("localhost")
        .with_query("SELECT id, name, score FROM people")
        .with_output(output)
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("output file should exist")
}

#[tokio::test]
async fn test_pipeline_writes_rows_without_header() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("people.csv");
    let session = MemorySession::new(
        ["id", "name", "score"],
        vec![
            vec![
                CellValue::Integer(1),
                CellValue::Text("Alice".into()),
                CellValue::Null,
            ],
            vec![
                CellValue::Integer(2),
                CellValue::Text("Bob".into()),
                CellValue::Integer(7),
            ],
        ],
    );

    let summary = export_with_session(Box::new(session), &config_for(&output))
        .await
        .unwrap();

    assert_eq!(summary.rows, 2);
    assert_eq!(read(&output), "1,Alice,\n2,Bob,7\n");
}

#[tokio::test]
async fn test_pipeline_zero_rows_creates_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("empty.csv");
    let session = MemorySession::new(["id", "name"], vec![]);

    let summary = export_with_session(Box::new(session), &config_for(&output))
        .await
        .unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(summary.columns, ["id", "name"]);
    assert!(output.exists());
    assert_eq!(read(&output), "");
}

#[tokio::test]
async fn test_pipeline_every_record_has_column_count_fields() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("wide.csv");
    let rows = (0..50)
        .map(|i| {
            vec![
                CellValue::Integer(i),
                CellValue::Text(format!("name, {i}")),
                CellValue::Bytes(format!("{i}.50").into_bytes()),
                CellValue::Null,
            ]
        })
        .collect();
    let session = MemorySession::new(["id", "name", "amount", "note"], rows);

    export_with_session(Box::new(session), &config_for(&output))
        .await
        .unwrap();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(&output)
        .unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 50);
    assert!(records.iter().all(|r| r.len() == 4));
    assert_eq!(&records[3][1], "name, 3");
    assert_eq!(&records[3][2], "3.50");
}

#[tokio::test]
async fn test_pipeline_unrecognized_value_keeps_earlier_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("partial.csv");
    let session = MemorySession::new(
        ["id", "active"],
        vec![
            vec![CellValue::Integer(1), CellValue::Text("yes".into())],
            vec![CellValue::Integer(2), CellValue::unrecognized("bit")],
            vec![CellValue::Integer(3), CellValue::Text("no".into())],
        ],
    );

    let error = export_with_session(Box::new(session), &config_for(&output))
        .await
        .unwrap_err();

    match error {
        ExportError::Coercion { column, source } => {
            assert_eq!(column, "active");
            assert_eq!(source, CoercionError::UnknownType("bit".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(read(&output), "1,yes\n");
}

#[tokio::test]
async fn test_pipeline_nil_type_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("nil.csv");
    let session = MemorySession::new(
        ["mystery"],
        vec![vec![CellValue::Unrecognized { type_name: None }]],
    );

    let error = export_with_session(Box::new(session), &config_for(&output))
        .await
        .unwrap_err();

    assert!(error.to_string().contains("Datatype: Nil"));
    assert_eq!(read(&output), "");
}

#[tokio::test]
async fn test_pipeline_fetch_error_is_query_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("fetch.csv");
    let session = MemorySession::new(
        ["id"],
        vec![vec![CellValue::Integer(1)], vec![CellValue::Integer(2)]],
    )
    .with_fetch_error_after(1);

    let error = export_with_session(Box::new(session), &config_for(&output))
        .await
        .unwrap_err();

    assert!(matches!(error, ExportError::Query { .. }));
    assert_eq!(error.stage(), "query");
    assert_eq!(read(&output), "1\n");
}

#[tokio::test]
async fn test_pipeline_missing_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("export").join("output.csv");
    let session = MemorySession::new(["id"], vec![vec![CellValue::Integer(1)]]);

    let error = export_with_session(Box::new(session), &config_for(&output))
        .await
        .unwrap_err();

    assert!(matches!(error, ExportError::FileCreate { .. }));
    assert!(!output.exists());
}
