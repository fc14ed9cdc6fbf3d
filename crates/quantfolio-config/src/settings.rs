//! Configuration structures.

use chrono::NaiveDate;
use quantfolio_core::traits::ContentFetcher;
use quantfolio_core::types::{SymbolUniverse, COMBINED_WINDOW, DEFAULT_SYMBOLS, MAX_SERIES_ROWS};
use quantfolio_data::fallback::{default_start_date, SymbolProfile};
use quantfolio_data::{
    DirectoryFetcher, FallbackGenerator, HttpFetcher, RecordParser, SourceLoader,
    DEFAULT_FILENAME_PATTERNS, DEFAULT_SOURCE_TIMEOUT, FALLBACK_ROWS,
};
use quantfolio_session::SessionOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub fallback: FallbackSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "quantfolio".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Where and how price series are loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub symbols: Vec<String>,
    /// Directory probed for static CSV files
    pub static_dir: String,
    /// HTTP origin for static files; takes precedence over `static_dir`
    pub base_url: Option<String>,
    pub filename_patterns: Vec<String>,
    /// Accepted rows kept per file
    pub max_rows: usize,
    /// Most recent dates kept in the combined table
    pub window: usize,
    pub source_timeout_secs: u64,
    pub parallel: bool,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            static_dir: "data".to_string(),
            base_url: None,
            filename_patterns: DEFAULT_FILENAME_PATTERNS.iter().map(|p| p.to_string()).collect(),
            max_rows: MAX_SERIES_ROWS,
            window: COMBINED_WINDOW,
            source_timeout_secs: DEFAULT_SOURCE_TIMEOUT.as_secs(),
            parallel: false,
        }
    }
}

/// Synthetic data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackSettings {
    pub start_date: NaiveDate,
    pub rows: usize,
    /// Fixed seed for reproducible sample data
    pub seed: Option<u64>,
    /// Per-symbol overrides of the built-in profiles
    pub profiles: HashMap<String, SymbolProfile>,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            rows: FALLBACK_ROWS,
            seed: None,
            profiles: HashMap::new(),
        }
    }
}

impl FallbackSettings {
    /// Profile override for a symbol. Keys match case-insensitively since
    /// the config loader lower-cases them.
    pub fn profile(&self, symbol: &str) -> Option<SymbolProfile> {
        self.profiles
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(symbol))
            .map(|(_, p)| *p)
    }
}

/// A configuration value that loads but cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("data.symbols is empty")]
    NoSymbols,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("filename pattern {0:?} has no {{SYMBOL}} or {{symbol}} placeholder")]
    Pattern(String),

    #[error("fallback profile for {symbol} needs a positive base and non-negative volatility")]
    Profile { symbol: String },

    #[error("unknown log format {0:?}, expected pretty or json")]
    LogFormat(String),
}

impl AppConfig {
    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.universe().is_empty() {
            return Err(ValidationError::NoSymbols);
        }
        for (name, value) in [
            ("data.max_rows", self.data.max_rows as u64),
            ("data.window", self.data.window as u64),
            ("data.source_timeout_secs", self.data.source_timeout_secs),
            ("fallback.rows", self.fallback.rows as u64),
        ] {
            if value == 0 {
                return Err(ValidationError::Zero(name));
            }
        }
        if self.data.filename_patterns.is_empty() {
            return Err(ValidationError::Zero("data.filename_patterns"));
        }
        if let Some(p) = self
            .data
            .filename_patterns
            .iter()
            .find(|p| !p.contains("{SYMBOL}") && !p.contains("{symbol}"))
        {
            return Err(ValidationError::Pattern(p.clone()));
        }
        for (symbol, profile) in &self.fallback.profiles {
            if !(profile.base > 0.0 && profile.volatility >= 0.0) {
                return Err(ValidationError::Profile {
                    symbol: symbol.to_uppercase(),
                });
            }
        }
        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            _ => Err(ValidationError::LogFormat(self.logging.format.clone())),
        }
    }

    pub fn universe(&self) -> SymbolUniverse {
        SymbolUniverse::new(&self.data.symbols)
    }

    pub fn parser(&self) -> RecordParser {
        RecordParser::default().with_max_rows(self.data.max_rows)
    }

    /// Static-source fetcher: HTTP when `base_url` is set, else the directory.
    pub fn fetcher(&self) -> Arc<dyn ContentFetcher> {
        match &self.data.base_url {
            Some(url) => Arc::new(HttpFetcher::new(url)),
            None => Arc::new(DirectoryFetcher::new(&self.data.static_dir)),
        }
    }

    /// Loader over [`fetcher`](Self::fetcher).
    pub fn loader(&self) -> SourceLoader {
        self.loader_with(self.fetcher())
    }

    /// Loader over a caller-supplied fetcher.
    pub fn loader_with(&self, fetcher: Arc<dyn ContentFetcher>) -> SourceLoader {
        SourceLoader::new(fetcher)
            .with_parser(self.parser())
            .with_patterns(self.data.filename_patterns.clone())
            .with_timeout(Duration::from_secs(self.data.source_timeout_secs))
    }

    pub fn fallback_generator(&self) -> FallbackGenerator {
        self.fallback
            .profiles
            .iter()
            .fold(
                FallbackGenerator::new(self.universe())
                    .with_start(self.fallback.start_date)
                    .with_rows(self.fallback.rows),
                |generator, (symbol, profile)| generator.with_profile(symbol, *profile),
            )
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            window: self.data.window,
            parallel: self.data.parallel,
            fallback_seed: self.fallback.seed,
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
