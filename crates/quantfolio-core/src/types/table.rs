//! Date-aligned multi-symbol table handed to the chart consumer.

use chrono::NaiveDate;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Maximum number of dates kept in a combined table.
pub const COMBINED_WINDOW: usize = 100;

/// One date across every tracked symbol.
///
/// Serializes flat with symbols in the order they were set, e.g.
/// `{"date":"2024-01-02","AAPL":185.2,"MSFT":null}`.
/// A `None` value means "no data for this date" and must not be interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub date: NaiveDate,
    pub prices: Vec<(String, Option<f64>)>,
}

impl CombinedRow {
    /// Create a row with no symbol values.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            prices: Vec::new(),
        }
    }

    /// Set the value for a symbol, keeping its original position if already set.
    pub fn set(&mut self, symbol: &str, price: Option<f64>) {
        match self.prices.iter_mut().find(|(s, _)| s == symbol) {
            Some(entry) => entry.1 = price,
            None => self.prices.push((symbol.to_string(), price)),
        }
    }

    /// Price for a symbol, `None` when missing.
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.prices
            .iter()
            .find(|(s, _)| s == symbol)
            .and_then(|(_, p)| *p)
    }

    /// Check if at least one symbol has a value.
    pub fn has_data(&self) -> bool {
        self.prices.iter().any(|(_, p)| p.is_some())
    }

    /// Check if every listed symbol has a value.
    pub fn is_complete(&self, symbols: &[String]) -> bool {
        symbols.iter().all(|s| self.price(s).is_some())
    }
}

impl Serialize for CombinedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.prices.len() + 1))?;
        map.serialize_entry("date", &self.date)?;
        for (symbol, price) in &self.prices {
            map.serialize_entry(symbol, price)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CombinedRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RowVisitor)
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = CombinedRow;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with a date and per-symbol prices")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CombinedRow, A::Error> {
        let mut date = None;
        let mut row = CombinedRow::new(NaiveDate::default());
        while let Some(key) = access.next_key::<String>()? {
            if key == "date" {
                date = Some(access.next_value::<NaiveDate>()?);
            } else {
                let price = access.next_value::<Option<f64>>()?;
                row.set(&key, price);
            }
        }
        row.date = date.ok_or_else(|| de::Error::missing_field("date"))?;
        Ok(row)
    }
}

/// Ascending-by-date table of combined rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedTable {
    /// Symbol column order
    pub symbols: Vec<String>,
    /// Rows, oldest first
    pub rows: Vec<CombinedRow>,
}

impl CombinedTable {
    /// Create an empty table for the given symbols.
    pub fn new(symbols: Vec<String>) -> Self {
        Self {
            symbols,
            rows: Vec::new(),
        }
    }

    /// Get the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the oldest row.
    pub fn first(&self) -> Option<&CombinedRow> {
        self.rows.first()
    }

    /// Get the most recent row.
    pub fn last(&self) -> Option<&CombinedRow> {
        self.rows.last()
    }

    /// All values of one symbol in row order.
    pub fn column(&self, symbol: &str) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.price(symbol)).collect()
    }

    /// Number of rows carrying a value for `symbol`.
    pub fn coverage(&self, symbol: &str) -> usize {
        self.rows.iter().filter(|r| r.price(symbol).is_some()).count()
    }

    /// Serialize the rows as the JSON array the chart consumes.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.rows)
    }
}
