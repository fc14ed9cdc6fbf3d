//! Synthetic sample data used when no real series could be loaded.

use chrono::{Duration, NaiveDate};
use quantfolio_core::types::{round_price, CombinedRow, CombinedTable, SymbolUniverse};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of rows generated by default.
pub const FALLBACK_ROWS: usize = 100;

/// Price shape for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolProfile {
    /// Starting price level
    pub base: f64,
    /// Multiplier on the random term
    pub volatility: f64,
}

impl SymbolProfile {
    pub fn new(base: f64, volatility: f64) -> Self {
        Self { base, volatility }
    }
}

impl Default for SymbolProfile {
    fn default() -> Self {
        Self::new(100.0, 1.0)
    }
}

/// Default profiles for the standard universe.
pub fn default_profiles() -> HashMap<String, SymbolProfile> {
    [
        ("AAPL", 185.0, 1.0),
        ("MSFT", 375.0, 0.9),
        ("GOOGL", 140.0, 1.1),
        ("AMZN", 150.0, 1.2),
        ("NVDA", 480.0, 2.0),
        ("TSLA", 240.0, 2.5),
        ("META", 350.0, 1.5),
    ]
    .into_iter()
    .map(|(s, base, vol)| (s.to_string(), SymbolProfile::new(base, vol)))
    .collect()
}

/// Default first date of the generated series.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Generates a plausible-looking multi-symbol table, one row per calendar day.
///
/// Each price is base + trend + sine cycle + scaled noise + sine momentum.
/// Only the noise is random; pass a seeded generator for reproducible output.
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    universe: SymbolUniverse,
    start: NaiveDate,
    rows: usize,
    profiles: HashMap<String, SymbolProfile>,
}

impl FallbackGenerator {
    /// Create a generator with default start date, row count and profiles.
    pub fn new(universe: SymbolUniverse) -> Self {
        Self {
            universe,
            start: default_start_date(),
            rows: FALLBACK_ROWS,
            profiles: default_profiles(),
        }
    }

    /// Set the first date.
    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    /// Set the number of rows.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Override or add a symbol profile.
    pub fn with_profile(mut self, symbol: &str, profile: SymbolProfile) -> Self {
        self.profiles.insert(symbol.to_uppercase(), profile);
        self
    }

    /// Get the symbol universe.
    pub fn universe(&self) -> &SymbolUniverse {
        &self.universe
    }

    fn profile(&self, symbol: &str) -> SymbolProfile {
        self.profiles.get(symbol).copied().unwrap_or_default()
    }

    /// Generate the table using the given random source.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> CombinedTable {
        let mut table = CombinedTable::new(self.universe.symbols().to_vec());
        table.rows.reserve(self.rows);

        for i in 0..self.rows {
            let date = self.start + Duration::days(i as i64);
            let t = i as f64;
            let mut row = CombinedRow::new(date);

            for (k, symbol) in self.universe.iter().enumerate() {
                let SymbolProfile { base, volatility } = self.profile(symbol);
                let trend = base * 0.001 * t;
                let cycle = base * 0.05 * (t * 0.1).sin();
                let noise = base * 0.02 * volatility * (rng.random::<f64>() - 0.5);
                let momentum = base * 0.03 * (t * 0.05 + k as f64).sin();
                let price = (base + trend + cycle + noise + momentum).max(0.01);
                row.set(symbol, Some(round_price(price)));
            }

            table.rows.push(row);
        }

        table
    }

    /// Generate the table with an entropy-seeded generator.
    pub fn generate_random(&self) -> CombinedTable {
        let mut rng = StdRng::seed_from_u64(rand::rng().random());
        self.generate(&mut rng)
    }

    /// Generate a reproducible table from a seed.
    pub fn generate_seeded(&self, seed: u64) -> CombinedTable {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(&mut rng)
    }
}
