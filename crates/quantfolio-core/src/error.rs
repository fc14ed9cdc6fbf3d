//! Error types for price-series ingestion.

use thiserror::Error;

/// Record parser failures that reject a whole source.
///
/// Row-level problems (bad dates, non-positive prices) are never errors;
/// the parser skips those rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{symbol}: CSV needs a header and at least one data row, found {lines} line(s)")]
    EmptySource { symbol: String, lines: usize },

    #[error(
        "{symbol}: could not find date/price columns (date index: {}, price index: {}); available headers: {}",
        fmt_index(.date_index),
        fmt_index(.price_index),
        .headers.join(", ")
    )]
    ColumnNotFound {
        symbol: String,
        date_index: Option<usize>,
        price_index: Option<usize>,
        headers: Vec<String>,
    },
}

fn fmt_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => i.to_string(),
        None => "none".to_string(),
    }
}

/// Failures reading a symbol's raw CSV text.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {millis} ms reading {path}")]
    Timeout { path: String, millis: u64 },

    #[error("No candidate sources for symbol '{0}'")]
    NoCandidates(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Session controller errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Symbol '{0}' is not part of the tracked universe")]
    UnknownSymbol(String),
}
