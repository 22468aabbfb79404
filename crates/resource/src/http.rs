use async_trait::async_trait;
use inkpage_traits::{ResourceError, ResourceFetcher, SharedResourceData};
use reqwest::StatusCode;
use std::sync::Arc;

/// Downloads resources over HTTP(S).
///
/// A 404 response is `NotFound`; any other non-success status is
/// `FetchFailed` carrying the status line. Identifiers that are not
/// `http://` or `https://` URLs are reported as `NotFound` without touching
/// the network.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to a default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn is_remote(src: &str) -> bool {
        let lower = src.trim_start().to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        if !Self::is_remote(src) {
            return Err(ResourceError::NotFound(src.to_string()));
        }

        let response = self
            .client
            .get(src)
            .send()
            .await
            .map_err(|e| ResourceError::Network {
                src: src.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResourceError::NotFound(src.to_string()));
        }
        if !status.is_success() {
            return Err(ResourceError::FetchFailed {
                src: src.to_string(),
                status: status.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| ResourceError::Network {
            src: src.to_string(),
            message: e.to_string(),
        })?;
        Ok(Arc::new(body.to_vec()))
    }

    fn name(&self) -> &'static str {
        "HttpFetcher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_remote_identifiers() {
        assert!(HttpFetcher::is_remote("https://example.com/font.ttf"));
        assert!(HttpFetcher::is_remote("HTTP://example.com/a.png"));
        assert!(!HttpFetcher::is_remote("fonts/Inter.ttf"));
        assert!(!HttpFetcher::is_remote("/usr/share/fonts/a.ttf"));
    }

    #[tokio::test]
    async fn local_identifiers_are_not_found() {
        let fetcher = HttpFetcher::new("inkpage-test");
        let result = fetcher.fetch("images/logo.png").await;
        assert_eq!(
            result,
            Err(ResourceError::NotFound("images/logo.png".to_string()))
        );
    }
}
