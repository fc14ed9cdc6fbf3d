//! Per-symbol price series.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Maximum number of points the record parser keeps per symbol.
pub const MAX_SERIES_ROWS: usize = 100;

/// Round a price to 2 fraction digits, half away from zero.
pub fn round_price(value: f64) -> f64 {
    match Decimal::try_from(value) {
        Ok(d) => d
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        // Outside the decimal range; values this large have no fraction left
        // and scaling them could overflow.
        Err(_) if value.abs() >= 1e15 || !value.is_finite() => value,
        Err(_) => (value * 100.0).round() / 100.0,
    }
}

/// A single dated closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Strictly positive price, rounded to cents
    pub price: f64,
}

impl PricePoint {
    /// Create a new point, rounding the price to 2 fraction digits.
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price: round_price(price),
        }
    }
}

/// Ordered price history for one ticker symbol.
///
/// Points are kept ascending by date. A series is built once per load and
/// replaced wholesale on reload, so there is no incremental update API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolSeries {
    /// Ticker symbol
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl SymbolSeries {
    /// Create an empty series.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Build a series from unordered points. Sorting is stable, so points
    /// sharing a date keep their input order.
    pub fn from_points(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get all points, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Get the oldest point.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Get the most recent point.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Price of the first point dated exactly `date`.
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.points.iter().find(|p| p.date == date).map(|p| p.price)
    }

    /// Iterate over the dates in the series.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }
}
