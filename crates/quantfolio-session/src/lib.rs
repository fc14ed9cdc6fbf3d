//! Session state controller.
//!
//! Owns the single [`SessionState`] for a page session and is its only
//! mutator. Loads go through numbered generations so a stale completion can
//! never overwrite newer state.

mod controller;
mod registry;
mod state;

pub use controller::{LoadOrigin, LoadOutcome, LoadPlan, LoadTicket, SessionController, SessionOptions};
pub use registry::UploadRegistry;
pub use state::{LoadStatus, NoticeKind, SessionNotice, SessionState, SessionView};
