//! Heuristic date parsing for heterogeneous CSV exports.
//!
//! The first structurally-matching form wins:
//! 1. contains `/`: month/day/year, re-read as day/month/year when that is
//!    not a real calendar date
//! 2. starts with a strict `YYYY-MM-DD`: ISO date (a trailing time is ignored)
//! 3. other `-` forms: day/month/year
//! 4. anything else: a list of free-form formats, then Unix timestamps
//!
//! `03/04/2024` is therefore always March 4; only impossible month/day
//! combinations are swapped.

use chrono::{DateTime, NaiveDate};

/// Free-form formats tried when no separator rule applies.
const FREE_FORM_FORMATS: [&str; 7] = [
    "%Y%m%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y.%m.%d",
    "%d.%m.%Y",
];

/// Parse a raw date cell using the default heuristics.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.contains('/') {
        parse_month_first(raw, '/')
    } else if raw.contains('-') {
        match iso_prefix(raw) {
            Some(iso) => NaiveDate::parse_from_str(iso, "%Y-%m-%d").ok(),
            None => parse_day_first(raw, '-'),
        }
    } else {
        parse_free_form(raw)
    }
}

/// Strict ISO date only; useful as a stricter drop-in strategy.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    iso_prefix(raw.trim()).and_then(|iso| NaiveDate::parse_from_str(iso, "%Y-%m-%d").ok())
}

/// Return the leading `YYYY-MM-DD` if the string has that exact shape,
/// optionally followed by a `T` or space time part.
fn iso_prefix(raw: &str) -> Option<&str> {
    let b = raw.as_bytes();
    if b.len() < 10 {
        return None;
    }
    let digits = |r: std::ops::Range<usize>| b[r].iter().all(u8::is_ascii_digit);
    let shaped = digits(0..4) && b[4] == b'-' && digits(5..7) && b[7] == b'-' && digits(8..10);
    let tail_ok = b.len() == 10 || matches!(b[10], b'T' | b' ');
    (shaped && tail_ok).then(|| &raw[..10])
}

/// Three numeric date parts in their written order.
struct Parts {
    first: u32,
    second: u32,
    last: u32,
    /// `last` read as a year, 2-digit years padded with `20`
    year: i32,
    year_first: bool,
}

fn split_parts(raw: &str, sep: char) -> Option<Parts> {
    let parts: Vec<&str> = raw.split(sep).map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let year: i32 = if parts[2].len() == 2 {
        format!("20{}", parts[2]).parse().ok()?
    } else {
        parts[2].parse().ok()?
    };
    Some(Parts {
        first: parts[0].parse().ok()?,
        second: parts[1].parse().ok()?,
        last: parts[2].parse().ok()?,
        year,
        year_first: parts[0].len() == 4,
    })
}

fn parse_month_first(raw: &str, sep: char) -> Option<NaiveDate> {
    let p = split_parts(raw, sep)?;
    NaiveDate::from_ymd_opt(p.year, p.first, p.second)
        .or_else(|| NaiveDate::from_ymd_opt(p.year, p.second, p.first))
        .or_else(|| year_first_date(&p))
}

fn parse_day_first(raw: &str, sep: char) -> Option<NaiveDate> {
    let p = split_parts(raw, sep)?;
    NaiveDate::from_ymd_opt(p.year, p.second, p.first).or_else(|| year_first_date(&p))
}

/// Last resort for `YYYY/M/D` and `YYYY-M-D` shapes that the ordered rules reject.
fn year_first_date(p: &Parts) -> Option<NaiveDate> {
    if !p.year_first {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(p.first).ok()?, p.second, p.last)
}

fn parse_free_form(raw: &str) -> Option<NaiveDate> {
    for format in FREE_FORM_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            return Some(d);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }

    // Unix timestamp; assume milliseconds if > 10 digits
    if raw.len() >= 9 && raw.bytes().all(|c| c.is_ascii_digit()) {
        let ts: i64 = raw.parse().ok()?;
        let dt = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        return dt.map(|dt| dt.date_naive());
    }

    None
}
