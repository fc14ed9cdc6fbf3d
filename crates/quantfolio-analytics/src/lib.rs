//! Portfolio statistics over a combined price table.

mod report;
mod statistics;

pub use report::StatisticsReport;
pub use statistics::{AnalyticsError, PortfolioStatistics, MIN_COMPLETE_ROWS};
