//! Concurrent image fetching
//!
//! Fetches the images referenced by a page with bounded concurrency.
//! Individual failures are logged and skipped; an image never aborts a
//! crawl. Results come back in discovery order regardless of completion
//! order, so downstream asset numbering is deterministic.

use crate::document::{FetchedAsset, ImageRef, MediaType};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Responses smaller than this are tracking pixels or error stubs, not
/// content images
const MIN_ASSET_BYTES: usize = 100;

/// Fetches page images with a concurrency ceiling and a per-request timeout
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: Client,
    concurrency: usize,
    timeout: Duration,
}

impl AssetFetcher {
    pub fn new(client: Client, concurrency: usize, timeout: Duration) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    /// Fetches every distinct image referenced by a page
    ///
    /// Duplicate URLs within the page are fetched once. Failed or rejected
    /// fetches are omitted from the result; surviving assets keep the order
    /// the references appeared in.
    pub async fn fetch_all(&self, refs: &[ImageRef]) -> Vec<FetchedAsset> {
        let mut seen = HashSet::new();
        let urls: Vec<String> = refs
            .iter()
            .filter(|r| !r.url.is_empty() && seen.insert(r.url.clone()))
            .map(|r| r.url.clone())
            .collect();

        if urls.is_empty() {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.into_iter().enumerate() {
            let fetcher = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return (index, None),
                };
                (index, fetcher.fetch_one(&url).await)
            });
        }

        let mut slots: Vec<Option<FetchedAsset>> = Vec::new();
        slots.resize_with(tasks.len(), || None);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, asset)) => slots[index] = asset,
                Err(e) => tracing::warn!("Asset fetch task panicked: {}", e),
            }
        }

        slots.into_iter().flatten().collect()
    }

    /// Fetches and validates a single image, returning None on any failure
    async fn fetch_one(&self, url: &str) -> Option<FetchedAsset> {
        let response = match self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to fetch image {}: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Image {} returned HTTP {}", url, response.status().as_u16());
            return None;
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !content_type.contains("image/") && !content_type.contains("octet-stream") {
            tracing::debug!("Skipping {}: content type '{}' is not an image", url, content_type);
            return None;
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::warn!("Failed to read image body from {}: {}", url, e);
                return None;
            }
        };

        if bytes.len() < MIN_ASSET_BYTES {
            tracing::debug!("Skipping {}: {} bytes is below the size floor", url, bytes.len());
            return None;
        }

        let media_type = MediaType::sniff(&bytes);
        Some(FetchedAsset {
            original_url: url.to_string(),
            bytes,
            media_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> AssetFetcher {
        AssetFetcher::new(Client::new(), 8, Duration::from_secs(5))
    }

    fn image_ref(url: String) -> ImageRef {
        ImageRef {
            url,
            alt: String::new(),
        }
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.resize(256, 0);
        bytes
    }

    #[tokio::test]
    async fn test_fetches_valid_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pic.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(png_bytes())
                    .insert_header("content-type", "image/png"),
            )
            .mount(&server)
            .await;

        let assets = fetcher()
            .fetch_all(&[image_ref(format!("{}/pic.png", server.uri()))])
            .await;

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].media_type, MediaType::Png);
        assert_eq!(assets[0].bytes, png_bytes());
    }

    #[tokio::test]
    async fn test_tiny_response_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pixel.gif"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8; 40])
                    .insert_header("content-type", "image/gif"),
            )
            .mount(&server)
            .await;

        let assets = fetcher()
            .fetch_all(&[image_ref(format!("{}/pixel.gif", server.uri()))])
            .await;

        assert!(assets.is_empty());
    }

    #[tokio::test]
    async fn test_non_image_content_type_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html>not an image</html>".repeat(10))
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;

        let assets = fetcher()
            .fetch_all(&[image_ref(format!("{}/page", server.uri()))])
            .await;

        assert!(assets.is_empty());
    }

    #[tokio::test]
    async fn test_octet_stream_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blob"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(png_bytes())
                    .insert_header("content-type", "application/octet-stream"),
            )
            .mount(&server)
            .await;

        let assets = fetcher()
            .fetch_all(&[image_ref(format!("{}/blob", server.uri()))])
            .await;

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].media_type, MediaType::Png);
    }

    #[tokio::test]
    async fn test_http_error_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let assets = fetcher()
            .fetch_all(&[image_ref(format!("{}/gone.jpg", server.uri()))])
            .await;

        assert!(assets.is_empty());
    }

    #[tokio::test]
    async fn test_results_keep_discovery_order() {
        let server = MockServer::start().await;
        for (name, delay_ms) in [("a.png", 200u64), ("b.png", 0)] {
            Mock::given(method("GET"))
                .and(path(format!("/{}", name)))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_bytes(png_bytes())
                        .insert_header("content-type", "image/png")
                        .set_delay(Duration::from_millis(delay_ms)),
                )
                .mount(&server)
                .await;
        }

        let refs = vec![
            image_ref(format!("{}/a.png", server.uri())),
            image_ref(format!("{}/b.png", server.uri())),
        ];
        let assets = fetcher().fetch_all(&refs).await;

        assert_eq!(assets.len(), 2);
        assert!(assets[0].original_url.ends_with("/a.png"));
        assert!(assets[1].original_url.ends_with("/b.png"));
    }

    #[tokio::test]
    async fn test_duplicate_refs_fetched_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logo.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(png_bytes())
                    .insert_header("content-type", "image/png"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/logo.png", server.uri());
        let refs = vec![image_ref(url.clone()), image_ref(url)];
        let assets = fetcher().fetch_all(&refs).await;

        assert_eq!(assets.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_host_skipped() {
        let assets = fetcher()
            .fetch_all(&[image_ref("http://127.0.0.1:1/img.png".to_string())])
            .await;
        assert!(assets.is_empty());
    }
}
