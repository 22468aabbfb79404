//! Filesystem-based fetcher for native platforms.
//!
//! Relative identifiers resolve against a base directory; absolute paths are
//! read as given. A sandboxed fetcher additionally refuses anything that
//! would resolve outside the base directory.

use async_trait::async_trait;
use inkpage_traits::{ResourceError, ResourceFetcher, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemFetcher {
    base_path: PathBuf,
    /// Canonicalized base path, present only in sandboxed mode.
    sandbox: Option<PathBuf>,
}

impl FilesystemFetcher {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            sandbox: None,
        }
    }

    /// A fetcher that only serves files below `base_path`.
    ///
    /// Absolute paths and `..` escapes are reported as `NotFound`.
    pub fn sandboxed<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().unwrap_or_else(|_| base.clone());
        Self {
            base_path: base,
            sandbox: Some(canonical),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, src: &str) -> Option<PathBuf> {
        let requested = Path::new(src);
        let Some(sandbox) = &self.sandbox else {
            return Some(self.base_path.join(requested));
        };

        if requested.is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(requested);
        if let Ok(canonical) = full_path.canonicalize() {
            return canonical.starts_with(sandbox).then_some(canonical);
        }

        // The file doesn't exist yet, so fall back to a component check.
        if requested
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }
        Some(full_path)
    }
}

#[async_trait]
impl ResourceFetcher for FilesystemFetcher {
    async fn fetch(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self
            .resolve(src)
            .ok_or_else(|| ResourceError::NotFound(format!("{} (outside base directory)", src)))?;

        match tokio::fs::read(&full_path).await {
            Ok(bytes) => Ok(Arc::new(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ResourceError::NotFound(src.to_string()))
            }
            Err(e) => Err(ResourceError::LoadFailed {
                path: src.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "FilesystemFetcher"
    }
}
