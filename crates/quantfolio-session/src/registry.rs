//! Uploaded file registry.

use quantfolio_core::traits::UploadFile;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Symbol to uploaded file handle. A missing symbol means no upload.
#[derive(Clone, Default)]
pub struct UploadRegistry {
    files: BTreeMap<String, Arc<dyn UploadFile>>,
}

impl UploadRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace the file for a symbol.
    pub fn set(&mut self, symbol: &str, file: Arc<dyn UploadFile>) -> Option<Arc<dyn UploadFile>> {
        self.files.insert(symbol.to_string(), file)
    }

    /// Remove a symbol's file.
    pub fn remove(&mut self, symbol: &str) -> Option<Arc<dyn UploadFile>> {
        self.files.remove(symbol)
    }

    /// Get a symbol's file.
    pub fn get(&self, symbol: &str) -> Option<&Arc<dyn UploadFile>> {
        self.files.get(symbol)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Symbols with an upload, sorted.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl fmt::Debug for UploadRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.files.iter().map(|(s, file)| (s, file.name())))
            .finish()
    }
}
