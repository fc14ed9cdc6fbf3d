//! CSV record parser.

use chrono::NaiveDate;
use quantfolio_core::error::ParseError;
use quantfolio_core::types::{round_price, PricePoint, SymbolSeries, MAX_SERIES_ROWS};
use tracing::{debug, warn};

use crate::dates::parse_date;
use crate::tokenizer::tokenize_line;

/// Header predicate used to locate a column. Receives the lower-cased header.
pub type HeaderMatcher = fn(&str) -> bool;

/// Date cell parser. Receives the cell with quotes and whitespace stripped.
pub type DateParser = fn(&str) -> Option<NaiveDate>;

/// Default date column rule.
pub fn is_date_header(header: &str) -> bool {
    header.is_empty() || ["date", "time", "day", "timestamp"].iter().any(|k| header.contains(k))
}

/// Default price column rule.
pub fn is_price_header(header: &str) -> bool {
    ["close", "price", "adj", "value", "closing", "last", "end"]
        .iter()
        .any(|k| header.contains(k))
}

/// Parse a price cell. Accepts a leading `$` and `,` thousands separators.
/// Returns `None` unless the value is finite and still positive once
/// rounded to cents.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| {
            let rounded = round_price(*p);
            p.is_finite() && rounded.is_finite() && rounded > 0.0
        })
}

fn clean_field(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}

/// Turns one symbol's raw CSV text into a sorted [`SymbolSeries`].
///
/// Column detection and date parsing are plain function pointers so a
/// stricter format can be swapped in without touching the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct RecordParser {
    date_header: HeaderMatcher,
    price_header: HeaderMatcher,
    date_parser: DateParser,
    max_rows: usize,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self {
            date_header: is_date_header,
            price_header: is_price_header,
            date_parser: parse_date,
            max_rows: MAX_SERIES_ROWS,
        }
    }
}

impl RecordParser {
    /// Create a parser with the default heuristics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the date column rule.
    pub fn with_date_header(mut self, matcher: HeaderMatcher) -> Self {
        self.date_header = matcher;
        self
    }

    /// Replace the price column rule.
    pub fn with_price_header(mut self, matcher: HeaderMatcher) -> Self {
        self.price_header = matcher;
        self
    }

    /// Replace the date cell parser.
    pub fn with_date_parser(mut self, parser: DateParser) -> Self {
        self.date_parser = parser;
        self
    }

    /// Set the maximum number of accepted rows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Maximum number of accepted rows.
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Parse raw CSV text. `symbol` is only used for diagnostics and to
    /// label the resulting series.
    ///
    /// Rows with a missing field, an invalid date or a non-positive price
    /// are skipped. An empty result is not an error.
    pub fn parse(&self, text: &str, symbol: &str) -> Result<SymbolSeries, ParseError> {
        let text = text.trim_start_matches('\u{feff}').trim();
        let lines: Vec<&str> = text.lines().collect();

        if lines.len() < 2 {
            return Err(ParseError::EmptySource {
                symbol: symbol.to_string(),
                lines: lines.len(),
            });
        }

        let headers: Vec<String> = tokenize_line(lines[0])
            .iter()
            .map(|h| clean_field(h).to_lowercase())
            .collect();

        let date_index = headers.iter().position(|h| (self.date_header)(h));
        let price_index = headers.iter().position(|h| (self.price_header)(h));

        let (date_idx, price_idx) = match (date_index, price_index) {
            (Some(d), Some(p)) => (d, p),
            _ => {
                return Err(ParseError::ColumnNotFound {
                    symbol: symbol.to_string(),
                    date_index,
                    price_index,
                    headers,
                })
            }
        };

        debug!(
            symbol = %symbol,
            date_column = %headers[date_idx],
            price_column = %headers[price_idx],
            "detected columns"
        );

        let min_len = date_idx.max(price_idx) + 1;
        let mut points = Vec::new();
        let mut skipped = 0usize;

        for (line_no, line) in lines.iter().enumerate().skip(1) {
            if points.len() >= self.max_rows {
                break;
            }

            let fields = tokenize_line(line);
            if fields.len() < min_len {
                skipped += 1;
                continue;
            }

            let raw_date = clean_field(&fields[date_idx]);
            let raw_price = clean_field(&fields[price_idx]);

            let Some(date) = (self.date_parser)(&raw_date) else {
                warn!(symbol = %symbol, line = line_no + 1, value = %raw_date, "skipping row with invalid date");
                skipped += 1;
                continue;
            };

            let Some(price) = parse_price(&raw_price) else {
                warn!(symbol = %symbol, line = line_no + 1, value = %raw_price, "skipping row with invalid price");
                skipped += 1;
                continue;
            };

            points.push(PricePoint::new(date, price));
        }

        debug!(symbol = %symbol, rows = points.len(), skipped, "parsed CSV");

        Ok(SymbolSeries::from_points(symbol, points))
    }
}

/// Parse CSV text with the default parser.
pub fn parse_csv(text: &str, symbol: &str) -> Result<SymbolSeries, ParseError> {
    RecordParser::default().parse(text, symbol)
}
