//! Per-symbol source loading.

use quantfolio_core::error::SourceError;
use quantfolio_core::traits::{ContentFetcher, UploadFile};
use quantfolio_core::types::SymbolSeries;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::parser::RecordParser;

/// Filename templates probed for each symbol, in order.
/// `{SYMBOL}` is the upper-case ticker, `{symbol}` the lower-case one.
pub const DEFAULT_FILENAME_PATTERNS: [&str; 8] = [
    "{SYMBOL}.csv",
    "{symbol}.csv",
    "{SYMBOL}_data.csv",
    "{symbol}_data.csv",
    "{SYMBOL}_daily.csv",
    "{symbol}_daily.csv",
    "{SYMBOL}_yearly_data_compact.csv",
    "{symbol}_yearly_data_compact.csv",
];

/// Default per-source timeout.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves a symbol's raw CSV text and hands it to the [`RecordParser`].
///
/// The `load_*` methods never fail: any problem is logged and yields an
/// empty series. The `try_load_*` variants expose the underlying error.
#[derive(Clone)]
pub struct SourceLoader {
    fetcher: Arc<dyn ContentFetcher>,
    parser: RecordParser,
    patterns: Vec<String>,
    timeout: Duration,
}

impl SourceLoader {
    /// Create a loader with default parser, patterns and timeout.
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            fetcher,
            parser: RecordParser::default(),
            patterns: DEFAULT_FILENAME_PATTERNS.iter().map(|p| p.to_string()).collect(),
            timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    /// Set the record parser.
    pub fn with_parser(mut self, parser: RecordParser) -> Self {
        self.parser = parser;
        self
    }

    /// Set the filename templates.
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Set the per-source timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the record parser.
    pub fn parser(&self) -> &RecordParser {
        &self.parser
    }

    /// Candidate static filenames for a symbol, without duplicates.
    pub fn candidates(&self, symbol: &str) -> Vec<String> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Vec::new();
        }
        let upper = symbol.to_uppercase();
        let lower = symbol.to_lowercase();

        let mut out: Vec<String> = Vec::with_capacity(self.patterns.len());
        for pattern in &self.patterns {
            let name = pattern.replace("{SYMBOL}", &upper).replace("{symbol}", &lower);
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }

    /// Load a symbol from static sources, returning an empty series on failure.
    pub async fn load_static(&self, symbol: &str) -> SymbolSeries {
        match self.try_load_static(symbol).await {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol = %symbol, fetcher = self.fetcher.name(), error = %e, "no static data");
                SymbolSeries::new(symbol)
            }
        }
    }

    /// Load a symbol from the first candidate file that can be fetched.
    ///
    /// A parse failure of that file is returned as is; later candidates are
    /// not tried.
    pub async fn try_load_static(&self, symbol: &str) -> Result<SymbolSeries, SourceError> {
        let candidates = self.candidates(symbol);
        let mut last_error = None;

        for candidate in &candidates {
            match self.bounded(candidate, self.fetcher.fetch_text(candidate)).await {
                Ok(text) => {
                    let series = self.parser.parse(&text, symbol)?;
                    info!(symbol = %symbol, source = %candidate, points = series.len(), "loaded static data");
                    return Ok(series);
                }
                Err(e) => {
                    debug!(symbol = %symbol, source = %candidate, error = %e, "candidate unavailable");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SourceError::NoCandidates(symbol.to_string())))
    }

    /// Load a symbol from an uploaded file, returning an empty series on failure.
    pub async fn load_upload(&self, symbol: &str, file: &dyn UploadFile) -> SymbolSeries {
        match self.try_load_upload(symbol, file).await {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol = %symbol, file = file.name(), error = %e, "could not load uploaded file");
                SymbolSeries::new(symbol)
            }
        }
    }

    /// Read and parse an uploaded file.
    pub async fn try_load_upload(
        &self,
        symbol: &str,
        file: &dyn UploadFile,
    ) -> Result<SymbolSeries, SourceError> {
        let text = self.bounded(file.name(), file.read_text()).await?;
        let series = self.parser.parse(&text, symbol)?;
        info!(symbol = %symbol, file = file.name(), points = series.len(), "loaded uploaded data");
        Ok(series)
    }

    async fn bounded<F>(&self, path: &str, fut: F) -> Result<String, SourceError>
    where
        F: Future<Output = Result<String, SourceError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                path: path.to_string(),
                millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
