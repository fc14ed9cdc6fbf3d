//! Session state and user-facing notices.

use quantfolio_core::types::CombinedTable;
use serde::{Deserialize, Serialize};

use crate::controller::LoadOrigin;
use crate::registry::UploadRegistry;

/// Where the session is in its load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Idle,
    Loading,
    /// Every attempted symbol produced data
    Ready,
    /// Some attempted symbols produced data
    ReadyWithWarning,
    /// Showing synthetic sample data
    Fallback,
}

/// Structured reason behind a session notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoticeKind {
    /// No attempted symbol produced data; fallback data is shown
    NoDataLoaded { attempted: usize },
    /// Only some attempted symbols produced data
    PartialData { loaded: usize, attempted: usize },
}

/// Informational message shown next to the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNotice {
    pub kind: NoticeKind,
    pub message: String,
}

impl SessionNotice {
    pub(crate) fn no_data(origin: LoadOrigin, attempted: usize) -> Self {
        let message = match origin {
            LoadOrigin::Static => {
                "Could not load stock data from any source; showing sample data instead.".to_string()
            }
            LoadOrigin::Uploads => {
                "None of the uploaded files could be read; showing sample data instead.".to_string()
            }
        };
        Self {
            kind: NoticeKind::NoDataLoaded { attempted },
            message,
        }
    }

    pub(crate) fn partial(origin: LoadOrigin, loaded: usize, attempted: usize) -> Self {
        let message = match origin {
            LoadOrigin::Static => format!("Loaded data for {} of {} stocks.", loaded, attempted),
            LoadOrigin::Uploads => format!("Loaded {} of {} uploaded files.", loaded, attempted),
        };
        Self {
            kind: NoticeKind::PartialData { loaded, attempted },
            message,
        }
    }
}

/// Everything the presentation layer reads for the current page session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub data: CombinedTable,
    pub loading: bool,
    pub error: Option<SessionNotice>,
    pub uploads: UploadRegistry,
    pub status: LoadStatus,
}

impl SessionState {
    pub(crate) fn new(symbols: Vec<String>) -> Self {
        Self {
            data: CombinedTable::new(symbols),
            loading: false,
            error: None,
            uploads: UploadRegistry::new(),
            status: LoadStatus::Idle,
        }
    }

    /// Serializable snapshot for the chart consumer.
    pub fn view(&self) -> SessionView {
        SessionView {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.as_ref().map(|n| n.message.clone()),
            notice: self.error.as_ref().map(|n| n.kind),
            status: self.status,
            uploads: self.uploads.symbols().map(str::to_string).collect(),
        }
    }
}

/// Read-only, serializable copy of [`SessionState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub data: CombinedTable,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<NoticeKind>,
    pub status: LoadStatus,
    pub uploads: Vec<String>,
}
