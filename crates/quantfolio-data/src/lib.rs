//! CSV ingestion, alignment and fallback data for tracked symbols.
//!
//! Data flows source loader → record parser → aligner; the fallback
//! generator substitutes synthetic data when nothing could be loaded.

pub mod aligner;
pub mod dates;
pub mod export;
pub mod fallback;
pub mod fetch;
pub mod loader;
pub mod parser;
pub mod tokenizer;

pub use aligner::align;
pub use fallback::{FallbackGenerator, SymbolProfile, FALLBACK_ROWS};
pub use fetch::{DirectoryFetcher, HttpFetcher, LocalFile, MemoryFetcher, MemoryFile};
pub use loader::{SourceLoader, DEFAULT_FILENAME_PATTERNS, DEFAULT_SOURCE_TIMEOUT};
pub use parser::{parse_csv, RecordParser};
pub use tokenizer::tokenize_line;

use quantfolio_core::error::SourceError;
use quantfolio_core::types::SymbolSeries;
use std::path::Path;

/// Load one symbol's series from a CSV file on disk.
pub async fn load_csv(path: &Path, symbol: &str) -> Result<SymbolSeries, SourceError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| fetch::read_error(&path.display().to_string(), e))?;
    Ok(parse_csv(&text, symbol)?)
}
