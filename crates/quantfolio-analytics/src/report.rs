//! Statistics report generation.

use quantfolio_core::types::CombinedTable;
use serde::{Deserialize, Serialize};

use crate::{AnalyticsError, PortfolioStatistics};

/// Trading days used to annualize daily figures.
const TRADING_DAYS: f64 = 252.0;

/// Statistics plus the table shape they were computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Rows in the source table
    pub rows: usize,
    /// Rows with every symbol present
    pub complete_rows: usize,
    pub stats: PortfolioStatistics,
}

impl StatisticsReport {
    /// Build a report for a table.
    pub fn from_table(table: &CombinedTable) -> Result<Self, AnalyticsError> {
        let stats = PortfolioStatistics::from_table(table)?;
        Ok(Self {
            rows: table.len(),
            complete_rows: stats.observations + 1,
            stats,
        })
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let stats = &self.stats;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                  PORTFOLIO STATISTICS                     \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("DATA\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Period:              {} to {}\n", stats.start, stats.end));
        s.push_str(&format!("  Rows:                {}\n", self.rows));
        s.push_str(&format!("  Complete Rows:       {}\n", self.complete_rows));
        s.push_str(&format!("  Observations:        {}\n", stats.observations));
        s.push('\n');

        s.push_str("RETURNS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str("  Symbol   Mean/Day   Vol/Day   Ann. Return   Ann. Vol\n");
        for (i, symbol) in stats.symbols.iter().enumerate() {
            let mean = stats.mean_returns[i];
            let vol = stats.volatility[i];
            s.push_str(&format!(
                "  {:<6} {:>9.3}% {:>8.3}% {:>12.2}% {:>9.2}%\n",
                symbol,
                mean * 100.0,
                vol * 100.0,
                mean * TRADING_DAYS * 100.0,
                vol * TRADING_DAYS.sqrt() * 100.0,
            ));
        }
        s.push('\n');

        s.push_str("COVARIANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str("        ");
        for symbol in &stats.symbols {
            s.push_str(&format!("{:>10}", symbol));
        }
        s.push('\n');
        for (symbol, row) in stats.symbols.iter().zip(&stats.covariance) {
            s.push_str(&format!("  {:<6}", symbol));
            for value in row {
                s.push_str(&format!("{:>10.6}", value));
            }
            s.push('\n');
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the covariance matrix as CSV.
    pub fn covariance_to_csv(&self) -> String {
        let mut csv = String::from("symbol");
        for symbol in &self.stats.symbols {
            csv.push(',');
            csv.push_str(symbol);
        }
        csv.push('\n');
        for (symbol, row) in self.stats.symbols.iter().zip(&self.stats.covariance) {
            csv.push_str(symbol);
            for value in row {
                csv.push_str(&format!(",{}", value));
            }
            csv.push('\n');
        }
        csv
    }
}
