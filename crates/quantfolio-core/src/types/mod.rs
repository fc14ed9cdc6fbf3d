//! Core data types for price-series ingestion.

mod series;
mod table;
mod universe;

pub use series::{round_price, PricePoint, SymbolSeries, MAX_SERIES_ROWS};
pub use table::{CombinedRow, CombinedTable, COMBINED_WINDOW};
pub use universe::{SymbolUniverse, DEFAULT_SYMBOLS};
