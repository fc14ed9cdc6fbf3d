use quantfolio_core::error::{ParseError, SourceError};
use quantfolio_data::load_csv;
use std::io::Write;

#[tokio::test]
async fn test_load_csv_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
    writeln!(file, "2024-06-14,213.85,215.17,211.30,212.49,70122748").unwrap();
    writeln!(file, "2024-06-13,214.74,216.75,211.60,214.24,97862729").unwrap();

    let series = load_csv(file.path(), "AAPL").await.unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.last().unwrap().price, 212.49);
}

#[tokio::test]
async fn test_load_csv_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "only,a,header").unwrap();

    let err = load_csv(file.path(), "AAPL").await.unwrap_err();
    assert!(matches!(err, SourceError::Parse(ParseError::EmptySource { .. })));

}

#[tokio::test]
async fn test_load_csv_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("AAPL.csv");

    match load_csv(&path, "AAPL").await {
        Err(SourceError::NotFound(p)) => assert!(p.ends_with("AAPL.csv")),
        other => panic!("expected NotFound, got {:?}", other.map(|s| s.len())),
    }
}
