//! Logging and session status reporting.

mod logging;
mod status;

pub use logging::setup_logging;
pub use status::{coverage_line, log_view, status_line};
