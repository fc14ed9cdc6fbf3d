//! Content fetchers and upload handles.

use async_trait::async_trait;
use quantfolio_core::error::SourceError;
use quantfolio_core::traits::{ContentFetcher, UploadFile};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub(crate) fn read_error(path: &str, err: std::io::Error) -> SourceError {
    if err.kind() == ErrorKind::NotFound {
        SourceError::NotFound(path.to_string())
    } else {
        SourceError::Io(err)
    }
}

/// Serves static files from a local directory.
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    /// Create a fetcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentFetcher for DirectoryFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| read_error(&full.display().to_string(), e))
    }

    fn name(&self) -> &str {
        "directory"
    }
}

/// Fetches static files from an HTTP origin, e.g. the site's `/data` folder.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a fetcher sharing an existing client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::NotFound(format!("{} ({})", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// In-memory path to text map.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, String>,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }
}

#[async_trait]
impl ContentFetcher for MemoryFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Upload handle backed by a file on disk.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

impl LocalFile {
    /// Create a handle for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

#[async_trait]
impl UploadFile for LocalFile {
    async fn read_text(&self) -> Result<String, SourceError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| read_error(&self.path.display().to_string(), e))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Upload handle holding its content in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    contents: String,
}

impl MemoryFile {
    /// Create a handle with the given content.
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

#[async_trait]
impl UploadFile for MemoryFile {
    async fn read_text(&self) -> Result<String, SourceError> {
        Ok(self.contents.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
