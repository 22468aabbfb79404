//! ResourceFetcher trait for abstracting resource loading.
//!
//! The renderer resolves every font and image source identifier through this
//! trait, so it never touches the filesystem or the network directly.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to fetch file at {src}: {status}")]
    FetchFailed { src: String, status: String },

    #[error("Network error while fetching {src}: {message}")]
    Network { src: String, message: String },

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// Resolves a source identifier (path or URL) to raw bytes.
///
/// # Implementations
///
/// - `InMemoryFetcher`: pre-populated memory store (always available)
/// - `FilesystemFetcher`, `HttpFetcher`, `FallbackFetcher`: in `inkpage-resource`
#[async_trait]
pub trait ResourceFetcher: Send + Sync + Debug {
    /// Fetch a resource by its path/URI.
    ///
    /// A missing resource must be reported as [`ResourceError::NotFound`],
    /// never as an empty buffer.
    async fn fetch(&self, src: &str) -> Result<SharedResourceData, ResourceError>;

    /// Returns a human-readable name for this fetcher (for logging/debugging).
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: ResourceFetcher + ?Sized> ResourceFetcher for Arc<T> {
    async fn fetch(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        (**self).fetch(src).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// An in-memory fetcher.
///
/// Resources must be added before use. Every call to `fetch` is counted,
/// which makes it useful for checking that callers cache what they load.
#[derive(Debug, Default)]
pub struct InMemoryFetcher {
    resources: RwLock<HashMap<String, SharedResourceData>>,
    fetches: AtomicUsize,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource to the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        self.add_shared(path, Arc::new(data))
    }

    /// Add a resource from shared data.
    pub fn add_shared(
        &self,
        path: impl Into<String>,
        data: SharedResourceData,
    ) -> Result<(), ResourceError> {
        let path_string = path.into();
        let mut resources = self
            .resources
            .write()
            .map_err(|_| ResourceError::LoadFailed {
                path: path_string.clone(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources.insert(path_string, data);
        Ok(())
    }

    /// Builder-style variant of [`InMemoryFetcher::add`].
    pub fn with(self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut resources) = self.resources.write() {
            resources.insert(path.into(), Arc::new(data.into()));
        }
        self
    }

    /// Number of `fetch` calls made so far, successful or not.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResourceFetcher for InMemoryFetcher {
    async fn fetch(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let resources = self
            .resources
            .read()
            .map_err(|_| ResourceError::LoadFailed {
                path: src.to_string(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources
            .get(src)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(src.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryFetcher"
    }
}
