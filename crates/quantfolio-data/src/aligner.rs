//! Multi-series date alignment.

use chrono::NaiveDate;
use quantfolio_core::types::{CombinedRow, CombinedTable, SymbolSeries, SymbolUniverse};
use std::collections::{BTreeSet, HashMap};

/// Merge per-symbol series into one date-indexed table.
///
/// Keeps the most recent `window` dates seen in any series. Each universe
/// symbol gets the price of its first point on that exact date, or `None`.
/// Rows where every symbol is `None` are dropped. Series whose symbol is not
/// in the universe are ignored.
pub fn align(
    series: &HashMap<String, SymbolSeries>,
    universe: &SymbolUniverse,
    window: usize,
) -> CombinedTable {
    let included: Vec<(&str, &SymbolSeries)> = universe
        .iter()
        .filter_map(|symbol| series.get(symbol).map(|s| (symbol, s)))
        .filter(|(_, s)| !s.is_empty())
        .collect();

    let dates: BTreeSet<NaiveDate> = included.iter().flat_map(|(_, s)| s.dates()).collect();
    let skip = dates.len().saturating_sub(window);

    let lookups: HashMap<&str, HashMap<NaiveDate, f64>> = included
        .iter()
        .map(|(symbol, s)| {
            let mut by_date = HashMap::with_capacity(s.len());
            for p in s.points() {
                by_date.entry(p.date).or_insert(p.price);
            }
            (*symbol, by_date)
        })
        .collect();

    let mut table = CombinedTable::new(universe.symbols().to_vec());
    for date in dates.into_iter().skip(skip) {
        let mut row = CombinedRow::new(date);
        for symbol in universe.iter() {
            let price = lookups.get(symbol).and_then(|m| m.get(&date).copied());
            row.set(symbol, price);
        }
        if row.has_data() {
            table.rows.push(row);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantfolio_core::types::{PricePoint, COMBINED_WINDOW};

    fn d(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn series(symbol: &str, days: &[i64]) -> SymbolSeries {
        SymbolSeries::from_points(
            symbol,
            days.iter().map(|&i| PricePoint::new(d(i), 100.0 + i as f64)).collect(),
        )
    }

    fn two_symbols() -> SymbolUniverse {
        SymbolUniverse::new(["AAPL", "MSFT"])
    }

    #[test]
    fn test_disjoint_dates_fill_none() {
        let mut input = HashMap::new();
        input.insert("AAPL".to_string(), series("AAPL", &[0, 2]));
        input.insert("MSFT".to_string(), series("MSFT", &[1]));

        let table = align(&input, &two_symbols(), COMBINED_WINDOW);

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].price("AAPL"), Some(100.0));
        assert_eq!(table.rows[0].price("MSFT"), None);
        assert_eq!(table.rows[1].price("AAPL"), None);
        assert_eq!(table.rows[1].price("MSFT"), Some(101.0));
        assert!(table.rows.iter().all(CombinedRow::has_data));
    }

    #[test]
    fn test_unloaded_symbols_are_null_and_empty_dates_absent() {
        let mut input = HashMap::new();
        input.insert("AAPL".to_string(), series("AAPL", &[0, 5]));
        input.insert("MSFT".to_string(), SymbolSeries::new("MSFT"));

        let universe = SymbolUniverse::default();
        let table = align(&input, &universe, COMBINED_WINDOW);

        assert_eq!(table.len(), 2);
        assert_eq!(table.symbols.len(), 7);
        for row in &table.rows {
            assert_eq!(row.prices.len(), 7);
            assert_eq!(row.price("TSLA"), None);
            let order: Vec<&str> = row.prices.iter().map(|(s, _)| s.as_str()).collect();
            assert_eq!(order, universe.iter().collect::<Vec<_>>());
        }
        assert!(table.rows.iter().all(|r| r.date != d(3)));
    }

    #[test]
    fn test_window_keeps_most_recent() {
        let days: Vec<i64> = (0..150).collect();
        let mut input = HashMap::new();
        input.insert("AAPL".to_string(), series("AAPL", &days));

        let table = align(&input, &two_symbols(), COMBINED_WINDOW);

        assert_eq!(table.len(), 100);
        assert_eq!(table.first().unwrap().date, d(50));
        assert_eq!(table.last().unwrap().date, d(149));
        assert!(table.rows.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_duplicate_dates_take_first_point() {
        let points = vec![PricePoint::new(d(0), 1.0), PricePoint::new(d(0), 2.0)];
        let mut input = HashMap::new();
        input.insert("AAPL".to_string(), SymbolSeries::from_points("AAPL", points));

        let table = align(&input, &two_symbols(), COMBINED_WINDOW);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].price("AAPL"), Some(1.0));
    }

    #[test]
    fn test_idempotent() {
        let mut input = HashMap::new();
        input.insert("AAPL".to_string(), series("AAPL", &[0, 1, 2]));
        input.insert("MSFT".to_string(), series("MSFT", &[2, 3]));
        input.insert("XYZ".to_string(), series("XYZ", &[9]));

        let first = align(&input, &two_symbols(), COMBINED_WINDOW);
        let second = align(&input, &two_symbols(), COMBINED_WINDOW);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_empty_input() {
        let table = align(&HashMap::new(), &two_symbols(), COMBINED_WINDOW);
        assert!(table.is_empty());
        assert_eq!(table.symbols, vec!["AAPL", "MSFT"]);
    }
}
