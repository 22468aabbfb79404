use async_trait::async_trait;
use inkpage_traits::{ResourceError, ResourceFetcher, SharedResourceData};
use std::sync::Arc;

/// Tries `primary` first and falls through to `secondary` on any failure.
///
/// When both fail, the secondary's error is returned since it is the last
/// word on the identifier (a network 404 is more telling than a missing
/// local file).
#[derive(Debug, Clone)]
pub struct FallbackFetcher {
    primary: Arc<dyn ResourceFetcher>,
    secondary: Arc<dyn ResourceFetcher>,
}

impl FallbackFetcher {
    pub fn new(primary: Arc<dyn ResourceFetcher>, secondary: Arc<dyn ResourceFetcher>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl ResourceFetcher for FallbackFetcher {
    async fn fetch(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        match self.primary.fetch(src).await {
            Ok(data) => Ok(data),
            Err(primary_err) => {
                log::warn!(
                    "{} could not resolve '{}' ({}); trying {}",
                    self.primary.name(),
                    src,
                    primary_err,
                    self.secondary.name()
                );
                self.secondary.fetch(src).await
            }
        }
    }

    fn name(&self) -> &'static str {
        "FallbackFetcher"
    }
}
