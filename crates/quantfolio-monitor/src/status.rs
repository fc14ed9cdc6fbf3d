//! One-line session status for terminals and logs.

use quantfolio_core::types::CombinedTable;
use quantfolio_session::{LoadStatus, SessionView};
use tracing::{info, warn};

fn status_label(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Idle => "IDLE",
        LoadStatus::Loading => "LOADING",
        LoadStatus::Ready => "READY",
        LoadStatus::ReadyWithWarning => "PARTIAL",
        LoadStatus::Fallback => "SAMPLE DATA",
    }
}

/// Header line: status, row count, date range and uploads.
pub fn status_line(view: &SessionView) -> String {
    let mut line = format!("[{}] {} rows", status_label(view.status), view.data.len());
    if let (Some(first), Some(last)) = (view.data.first(), view.data.last()) {
        line.push_str(&format!(" | {} to {}", first.date, last.date));
    }
    if !view.uploads.is_empty() {
        line.push_str(&format!(" | uploads: {}", view.uploads.join(", ")));
    }
    if let Some(message) = &view.error {
        line.push_str(&format!(" | {}", message));
    }
    line
}

/// Per-symbol non-empty cell counts, e.g. `AAPL 98/100  MSFT 0/100`.
pub fn coverage_line(table: &CombinedTable) -> String {
    table
        .symbols
        .iter()
        .map(|s| format!("{} {}/{}", s, table.coverage(s), table.len()))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Emit the view as a structured event.
pub fn log_view(view: &SessionView) {
    let rows = view.data.len();
    let status = status_label(view.status);
    match &view.error {
        Some(message) => warn!(status, rows, notice = %message, "session updated"),
        None => info!(status, rows, uploads = view.uploads.len(), "session updated"),
    }
}
