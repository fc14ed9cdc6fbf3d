//! The fixed, ordered set of tracked ticker symbols.

use serde::{Deserialize, Serialize};

/// Default universe: the "Magnificent 7" tickers, in display order.
pub const DEFAULT_SYMBOLS: [&str; 7] = ["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META"];

/// Ordered list of ticker symbols shared by the loader, aligner, fallback
/// generator and session controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolUniverse {
    symbols: Vec<String>,
}

impl SymbolUniverse {
    /// Build a universe. Symbols are upper-cased; blanks and duplicates are dropped.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for s in symbols {
            let s = s.as_ref().trim().to_uppercase();
            if !s.is_empty() && !out.contains(&s) {
                out.push(s);
            }
        }
        Self { symbols: out }
    }

    /// Get the symbols in order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Iterate over the symbols in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Get the number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the universe is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Check membership (case-insensitive).
    pub fn contains(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }

    /// Index of a symbol (case-insensitive).
    pub fn position(&self, symbol: &str) -> Option<usize> {
        let wanted = symbol.trim().to_uppercase();
        self.symbols.iter().position(|s| *s == wanted)
    }
}

impl Default for SymbolUniverse {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOLS)
    }
}

impl From<Vec<String>> for SymbolUniverse {
    fn from(symbols: Vec<String>) -> Self {
        Self::new(symbols)
    }
}

impl From<SymbolUniverse> for Vec<String> {
    fn from(universe: SymbolUniverse) -> Self {
        universe.symbols
    }
}
