//! External image acquisition: Google Custom Search lookups and download-by-URL.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::ImageSearchConfig;
use crate::error::{CatalogError, CatalogResult};

pub const MAX_SEARCH_RESULTS: usize = 10;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Downloaded image bytes with the declared content type
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Source of third-party images
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Image URLs for `term` in provider order; `count` is clamped to 1..=10
    async fn search(&self, term: &str, count: usize) -> CatalogResult<Vec<String>>;

    /// First search hit, if any
    async fn first_image(&self, term: &str) -> CatalogResult<Option<String>> {
        Ok(self.search(term, 1).await?.into_iter().next())
    }

    /// Download an image by URL
    async fn fetch(&self, url: &str) -> CatalogResult<FetchedImage>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

/// [`ImageSource`] backed by the Google Custom Search JSON API
#[derive(Clone, Debug)]
pub struct GoogleImageSource {
    config: ImageSearchConfig,
    client: Client,
}

impl GoogleImageSource {
    pub fn new(config: ImageSearchConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn credentials(&self) -> CatalogResult<(&str, &str)> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| CatalogError::ConfigurationMissing("GOOGLE_API_KEY".to_string()))?;
        let engine_id = self
            .config
            .search_engine_id
            .as_deref()
            .ok_or_else(|| CatalogError::ConfigurationMissing("GOOGLE_SEARCH_ENGINE_ID".to_string()))?;
        Ok((api_key, engine_id))
    }
}

#[async_trait]
impl ImageSource for GoogleImageSource {
    #[instrument(skip(self))]
    async fn search(&self, term: &str, count: usize) -> CatalogResult<Vec<String>> {
        let (api_key, engine_id) = self.credentials()?;

        let term = term.trim();
        if term.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "Search term must not be empty".to_string(),
            ));
        }

        let num = count.clamp(1, MAX_SEARCH_RESULTS).to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("key", api_key),
                ("cx", engine_id),
                ("q", term),
                ("searchType", "image"),
                ("num", num.as_str()),
                ("safe", "active"),
                ("imgSize", "large"),
            ])
            .timeout(self.config.search_timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Image search request failed");
                CatalogError::UpstreamError(format!("Image search request failed: {}", e))
            })?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(CatalogError::RateLimited),
            StatusCode::FORBIDDEN => return Err(CatalogError::Unauthorized),
            status if !status.is_success() => {
                warn!(%status, "Image search provider returned an error");
                return Err(CatalogError::UpstreamError(format!(
                    "Image search provider returned status {}",
                    status.as_u16()
                )));
            }
            _ => {}
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            CatalogError::UpstreamError(format!("Invalid image search response: {}", e))
        })?;

        let links: Vec<String> = body.items.into_iter().map(|item| item.link).collect();
        info!(results = links.len(), "Image search completed");
        Ok(links)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> CatalogResult<FetchedImage> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CatalogError::InvalidArgument(format!(
                "Invalid image URL: {}",
                url
            )));
        }

        let timeout = self.config.fetch_timeout;
        let transfer_error = |e: reqwest::Error| {
            if e.is_timeout() {
                CatalogError::Timeout(timeout)
            } else {
                CatalogError::UpstreamError(format!("Image download failed: {}", e))
            }
        };

        let mut response = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .timeout(timeout)
            .send()
            .await
            .map_err(transfer_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(CatalogError::NotFound(format!("Image not found: {}", url)));
            }
            status if !status.is_success() => {
                return Err(CatalogError::UpstreamError(format!(
                    "Image host returned status {}",
                    status.as_u16()
                )));
            }
            _ => {}
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(CatalogError::InvalidContent(format!(
                "URL does not point to an image (content type: {})",
                if content_type.is_empty() { "none" } else { content_type.as_str() }
            )));
        }

        let limit = self.config.max_fetch_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(CatalogError::PayloadTooLarge { limit });
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(transfer_error)? {
            if bytes.len() + chunk.len() > limit {
                debug!(received = bytes.len(), "Aborting oversized image download");
                return Err(CatalogError::PayloadTooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }

        info!(bytes = bytes.len(), %content_type, "Downloaded image");
        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}
