//! Capability traits consumed by the source loader.

mod source;

pub use source::{ContentFetcher, UploadFile};
