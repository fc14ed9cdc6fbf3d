//! Source capability traits.

use crate::error::SourceError;
use async_trait::async_trait;

/// Fetches the text content of a static source by path or filename.
///
/// No contract beyond success-with-text or failure; the transport may be a
/// local directory, an HTTP origin or an in-memory map.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the full text behind `path`.
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError>;

    /// Get the fetcher name.
    fn name(&self) -> &str;
}

/// An uploaded file handle whose content can be read as text.
#[async_trait]
pub trait UploadFile: Send + Sync {
    /// Read the whole file.
    async fn read_text(&self) -> Result<String, SourceError>;

    /// Display name of the file.
    fn name(&self) -> &str;
}
