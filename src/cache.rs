use crate::error::RenderError;
use inkpage_traits::{ResourceFetcher, SharedResourceData};
use std::collections::HashMap;

/// Per-render memo of fetched resources, keyed by source identifier.
///
/// Only successful fetches are stored, so a failed source is retried the
/// next time it is asked for.
#[derive(Debug, Default)]
pub struct ResourceCache {
    entries: HashMap<String, SharedResourceData>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn resolve(
        &mut self,
        source: &str,
        fetcher: &dyn ResourceFetcher,
    ) -> Result<SharedResourceData, RenderError> {
        if let Some(hit) = self.entries.get(source) {
            log::trace!("Resource cache hit: {}", source);
            return Ok(hit.clone());
        }
        log::debug!("Fetching resource '{}' via {}", source, fetcher.name());
        let data = fetcher.fetch(source).await?;
        self.entries.insert(source.to_string(), data.clone());
        Ok(data)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpage_traits::InMemoryFetcher;

    #[tokio::test]
    async fn second_resolve_is_a_hit() {
        let fetcher = InMemoryFetcher::new().with("logo.png", vec![1, 2, 3]);
        let mut cache = ResourceCache::new();

        let first = cache.resolve("logo.png", &fetcher).await.unwrap();
        let second = cache.resolve("logo.png", &fetcher).await.unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.fetch_count(), 1);
        assert!(cache.contains("logo.png"));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let fetcher = InMemoryFetcher::new();
        let mut cache = ResourceCache::new();

        assert!(cache.resolve("missing.png", &fetcher).await.is_err());
        assert!(cache.resolve("missing.png", &fetcher).await.is_err());
        assert_eq!(fetcher.fetch_count(), 2);
        assert!(cache.is_empty());
    }
}
