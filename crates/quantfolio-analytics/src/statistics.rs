//! Return statistics.

use chrono::NaiveDate;
use quantfolio_core::types::{CombinedRow, CombinedTable};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use thiserror::Error;
use tracing::debug;

/// Fewest complete rows that yield a sample covariance (two returns).
pub const MIN_COMPLETE_ROWS: usize = 3;

/// Reasons statistics cannot be computed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("no price data for: {}", .0.join(", "))]
    MissingSymbols(Vec<String>),

    #[error("need at least {required} rows with every symbol present, found {available}")]
    InsufficientData { required: usize, available: usize },
}

/// Per-symbol simple returns with their means, volatilities and covariance.
///
/// All vectors and matrix axes follow `symbols` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStatistics {
    pub symbols: Vec<String>,
    /// First date of the complete rows used
    pub start: NaiveDate,
    /// Last date of the complete rows used
    pub end: NaiveDate,
    /// Number of returns per symbol
    pub observations: usize,
    pub mean_returns: Vec<f64>,
    /// Sample standard deviation of returns
    pub volatility: Vec<f64>,
    /// Sample covariance matrix (n - 1 denominator)
    pub covariance: Vec<Vec<f64>>,
    returns: Vec<Vec<f64>>,
}

impl PortfolioStatistics {
    /// Compute statistics from the rows where every symbol has a price.
    pub fn from_table(table: &CombinedTable) -> Result<Self, AnalyticsError> {
        let missing: Vec<String> = table
            .symbols
            .iter()
            .filter(|s| table.coverage(s) == 0)
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(AnalyticsError::MissingSymbols(missing));
        }

        let complete: Vec<&CombinedRow> = table
            .rows
            .iter()
            .filter(|r| r.is_complete(&table.symbols))
            .collect();
        let (first, last) = match (complete.first(), complete.last()) {
            (Some(f), Some(l)) if complete.len() >= MIN_COMPLETE_ROWS => (f.date, l.date),
            _ => {
                return Err(AnalyticsError::InsufficientData {
                    required: MIN_COMPLETE_ROWS,
                    available: complete.len(),
                })
            }
        };

        let returns: Vec<Vec<f64>> = table
            .symbols
            .iter()
            .map(|symbol| {
                let prices: Vec<f64> = complete.iter().filter_map(|r| r.price(symbol)).collect();
                prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
            })
            .collect();

        let mean_returns = returns.iter().map(|r| r.iter().mean()).collect();
        let volatility = returns.iter().map(|r| r.iter().std_dev()).collect();
        let covariance = returns
            .iter()
            .map(|a| returns.iter().map(|b| a.iter().covariance(b.iter())).collect())
            .collect();

        debug!(
            rows = table.len(),
            complete = complete.len(),
            symbols = table.symbols.len(),
            "computed portfolio statistics"
        );

        Ok(Self {
            symbols: table.symbols.clone(),
            start: first,
            end: last,
            observations: complete.len() - 1,
            mean_returns,
            volatility,
            covariance,
            returns,
        })
    }

    fn index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s.eq_ignore_ascii_case(symbol))
    }

    /// Return series for a symbol.
    pub fn returns(&self, symbol: &str) -> Option<&[f64]> {
        self.index(symbol).map(|i| self.returns[i].as_slice())
    }

    pub fn mean_return(&self, symbol: &str) -> Option<f64> {
        self.index(symbol).map(|i| self.mean_returns[i])
    }

    /// Covariance between two symbols.
    pub fn covariance_of(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.covariance[self.index(a)?][self.index(b)?])
    }

    /// Pearson correlation between two symbols; `None` if either is constant.
    pub fn correlation(&self, a: &str, b: &str) -> Option<f64> {
        let (i, j) = (self.index(a)?, self.index(b)?);
        let denom = self.volatility[i] * self.volatility[j];
        (denom > 0.0).then(|| self.covariance[i][j] / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn table(prices: &[(Option<f64>, Option<f64>)]) -> CombinedTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut t = CombinedTable::new(vec!["AAPL".into(), "MSFT".into()]);
        for (i, (a, m)) in prices.iter().enumerate() {
            let mut row = CombinedRow::new(start + Duration::days(i as i64));
            row.set("AAPL", *a);
            row.set("MSFT", *m);
            t.rows.push(row);
        }
        t
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_returns_and_means() {
        let t = table(&[
            (Some(100.0), Some(50.0)),
            (Some(110.0), Some(50.0)),
            (Some(99.0), Some(55.0)),
        ]);
        let stats = PortfolioStatistics::from_table(&t).unwrap();

        assert_eq!(stats.observations, 2);
        let aapl = stats.returns("AAPL").unwrap();
        assert!(close(aapl[0], 0.1));
        assert!(close(aapl[1], -0.1));
        assert!(close(stats.mean_return("aapl").unwrap(), 0.0));
        assert!(close(stats.mean_return("MSFT").unwrap(), 0.05));
    }

    #[test]
    fn test_covariance_is_sample_and_symmetric() {
        let t = table(&[
            (Some(100.0), Some(50.0)),
            (Some(110.0), Some(50.0)),
            (Some(99.0), Some(55.0)),
        ]);
        let stats = PortfolioStatistics::from_table(&t).unwrap();

        // AAPL returns [0.1, -0.1]: sample variance = 0.02 / 1
        assert!(close(stats.covariance_of("AAPL", "AAPL").unwrap(), 0.02));
        // MSFT returns [0.0, 0.1]: cov = ((0.1)(-0.05) + (-0.1)(0.05)) / 1
        assert!(close(stats.covariance_of("AAPL", "MSFT").unwrap(), -0.01));
        assert_eq!(stats.covariance[0][1], stats.covariance[1][0]);
        assert!(close(stats.volatility[0], 0.02_f64.sqrt()));
        assert!(close(stats.correlation("AAPL", "MSFT").unwrap(), -1.0));
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let t = table(&[
            (Some(100.0), Some(50.0)),
            (Some(500.0), None),
            (Some(110.0), Some(55.0)),
            (None, Some(1.0)),
            (Some(121.0), Some(60.5)),
        ]);
        let stats = PortfolioStatistics::from_table(&t).unwrap();

        assert_eq!(stats.observations, 2);
        assert_eq!(stats.start, t.rows[0].date);
        assert_eq!(stats.end, t.rows[4].date);
        for r in stats.returns("MSFT").unwrap() {
            assert!(close(*r, 0.1));
        }
    }

    #[test]
    fn test_missing_symbol() {
        let t = table(&[(Some(1.0), None), (Some(2.0), None), (Some(3.0), None)]);
        assert_eq!(
            PortfolioStatistics::from_table(&t),
            Err(AnalyticsError::MissingSymbols(vec!["MSFT".into()]))
        );
    }

    #[test]
    fn test_insufficient_rows() {
        let t = table(&[(Some(1.0), Some(2.0)), (Some(2.0), None), (Some(3.0), Some(4.0))]);
        assert_eq!(
            PortfolioStatistics::from_table(&t),
            Err(AnalyticsError::InsufficientData {
                required: MIN_COMPLETE_ROWS,
                available: 2
            })
        );
    }

    #[test]
    fn test_constant_series_has_no_correlation() {
        let t = table(&[
            (Some(10.0), Some(1.0)),
            (Some(10.0), Some(2.0)),
            (Some(10.0), Some(3.0)),
        ]);
        let stats = PortfolioStatistics::from_table(&t).unwrap();
        assert_eq!(stats.volatility[0], 0.0);
        assert_eq!(stats.correlation("AAPL", "MSFT"), None);
    }
}
