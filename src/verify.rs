//! Manifest verification.
//!
//! A URL-shaped match is not a playable stream: geo-block pages, HTML
//! interstitials and error bodies all survive the regex scan. The probe
//! here is the sole authority on playability.

use tracing::debug;

use crate::fetch::PageFetcher;

/// Magic marker every HLS playlist starts with.
const MANIFEST_MAGIC: &str = "#EXTM3U";

/// How much of the body (after trimming leading whitespace) is inspected.
const PROBE_WINDOW: usize = 1024;

/// Returns `true` only if `url` serves a body whose first characters are
/// the manifest magic marker. Any fetch error yields `false`.
pub async fn verify_manifest<F: PageFetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    referer: &str,
) -> bool {
    match fetcher.fetch_manifest_probe(url, referer).await {
        Ok(body) => {
            let head: String = body.trim_start().chars().take(PROBE_WINDOW).collect();
            let ok = head.starts_with(MANIFEST_MAGIC);
            if !ok {
                debug!(%url, "probe body is not a manifest");
            }
            ok
        }
        Err(err) => {
            debug!(%url, %err, "manifest probe failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;

    use crate::error::FetchError;
    use crate::fetch::Headers;

    struct FixedBody(Result<String, ()>);

    #[async_trait]
    impl PageFetcher for FixedBody {
        async fn fetch_text(&self, _url: &str, _h: &Headers<'_>) -> Result<String, FetchError> {
            unreachable!("verifier only probes")
        }

        async fn fetch_json(&self, _url: &str, _h: &Headers<'_>) -> Result<Value, FetchError> {
            unreachable!("verifier only probes")
        }

        async fn fetch_manifest_probe(
            &self,
            url: &str,
            _referer: &str,
        ) -> Result<String, FetchError> {
            self.0.clone().map_err(|()| FetchError::Timeout {
                url: url.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn accepts_manifest_with_leading_whitespace() {
        let fetcher = FixedBody(Ok("\n  #EXTM3U\n#EXT-X-VERSION:3\n".to_string()));
        assert!(verify_manifest(&fetcher, "https://x/a.m3u8", "https://e/1").await);
    }

    #[tokio::test]
    async fn rejects_html_interstitial() {
        let fetcher = FixedBody(Ok("<!DOCTYPE html><html>blocked</html>".to_string()));
        assert!(!verify_manifest(&fetcher, "https://x/a.m3u8", "https://e/1").await);
    }

    #[tokio::test]
    async fn fetch_failure_is_false_not_error() {
        let fetcher = FixedBody(Err(()));
        assert!(!verify_manifest(&fetcher, "https://x/a.m3u8", "https://e/1").await);
    }
}
