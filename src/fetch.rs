//! Time-bounded text/JSON retrieval with header injection.
//!
//! [`PageFetcher`] is the seam every other component talks through, so the
//! pipeline can be exercised against canned pages in tests. [`HttpFetcher`]
//! is the production implementation on top of `reqwest`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::error::FetchError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_JSON: &str = "application/json, text/plain, */*";
const ACCEPT_MANIFEST: &str = "application/vnd.apple.mpegurl,application/x-mpegURL,audio/mpegurl,*/*;q=0.5";

/// Header pairs injected per request, on top of the fetcher defaults.
pub type Headers<'a> = [(&'a str, &'a str)];

/// Retrieval contract used by the resolver chain and the verifier.
///
/// Every method enforces a fixed wall-clock bound and fails with a
/// [`FetchError`] on non-2xx or expiry. No retries.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a page and return its body as text.
    async fn fetch_text(&self, url: &str, headers: &Headers<'_>) -> Result<String, FetchError>;

    /// GET a JSON endpoint and return the parsed value.
    async fn fetch_json(&self, url: &str, headers: &Headers<'_>) -> Result<Value, FetchError>;

    /// Manifest-flavored GET used for verification: manifest Accept header,
    /// the supplied Referer and a shorter timeout than page fetches.
    async fn fetch_manifest_probe(&self, url: &str, referer: &str) -> Result<String, FetchError>;
}

/// Production fetcher backed by a pooled `reqwest` client.
pub struct HttpFetcher {
    client: Client,
    config: Arc<ResolverConfig>,
}

impl HttpFetcher {
    pub fn new(config: Arc<ResolverConfig>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .tcp_nodelay(true)
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client, config })
    }

    fn request(
        &self,
        url: &str,
        accept: &str,
        timeout: Duration,
        headers: &Headers<'_>,
    ) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .timeout(timeout)
            .header("User-Agent", &self.config.user_agent)
            .header("Accept", accept)
            .header("Accept-Language", &self.config.accept_language);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        req
    }

    async fn send(req: reqwest::RequestBuilder, url: &str) -> Result<reqwest::Response, FetchError> {
        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Transport(e)
            }
        })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, headers: &Headers<'_>) -> Result<String, FetchError> {
        debug!(%url, "GET page");
        let req = self.request(url, ACCEPT_HTML, self.config.page_timeout, headers);
        let resp = Self::send(req, url).await?;
        Ok(resp.text().await?)
    }

    async fn fetch_json(&self, url: &str, headers: &Headers<'_>) -> Result<Value, FetchError> {
        debug!(%url, "GET json");
        let req = self.request(url, ACCEPT_JSON, self.config.page_timeout, headers);
        let resp = Self::send(req, url).await?;
        Ok(resp.json().await?)
    }

    async fn fetch_manifest_probe(&self, url: &str, referer: &str) -> Result<String, FetchError> {
        debug!(%url, %referer, "GET manifest probe");
        let req = self.request(
            url,
            ACCEPT_MANIFEST,
            self.config.probe_timeout,
            &[("Referer", referer)],
        );
        let resp = Self::send(req, url).await?;
        Ok(resp.text().await?)
    }
}
