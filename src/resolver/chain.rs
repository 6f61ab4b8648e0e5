//! Generic staged fallback chain for a single embed URL.
//!
//! Strategies accumulate into one pool rather than short-circuiting:
//! in-page scan, first nested frame, second-level nested frame (traversal
//! is capped there), and the proxy-host token endpoints when the first
//! frame matches a known hint. A failing strategy contributes nothing and
//! is logged; only the initial embed fetch aborts the chain for this URL.

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ResolverConfig;
use crate::descriptor::RawCandidate;
use crate::error::{ResolveError, Result};
use crate::extract;
use crate::fetch::PageFetcher;

pub(crate) async fn collect<F: PageFetcher + ?Sized>(
    fetcher: &F,
    config: &ResolverConfig,
    embed_url: &str,
) -> Result<Vec<RawCandidate>> {
    let html = fetcher.fetch_text(embed_url, &[]).await?;

    let mut pool: Vec<RawCandidate> = extract::manifest_urls(&html)
        .into_iter()
        .map(|u| RawCandidate::new(u.clone(), u, embed_url))
        .collect();

    let Some(frame) = extract::frame_src(&html, embed_url, 0) else {
        return Ok(pool);
    };

    match scan_frame(fetcher, &frame, embed_url).await {
        Ok((found, inner)) => {
            pool.extend(found);
            if let Some(inner) = inner {
                // Depth cap: two frames beyond the embed page, no deeper.
                match scan_frame(fetcher, &inner, &frame).await {
                    Ok((found, _)) => pool.extend(found),
                    Err(err) => warn!(%inner, %err, "second-level frame scan failed"),
                }
            }
        }
        Err(err) => warn!(%frame, %err, "nested frame scan failed"),
    }

    if extract::is_proxy_host(&frame, &config.proxy_host_hints) {
        match proxy_token_candidates(fetcher, config, &frame).await {
            Ok(found) => pool.extend(found),
            Err(err) => warn!(%frame, %err, "proxy token resolution failed"),
        }
    }

    Ok(pool)
}

/// Fetch one frame page (parent as Referer), scan it for manifests and
/// report its own first nested frame, if any.
async fn scan_frame<F: PageFetcher + ?Sized>(
    fetcher: &F,
    frame_url: &str,
    parent_url: &str,
) -> Result<(Vec<RawCandidate>, Option<String>)> {
    let html = fetcher
        .fetch_text(frame_url, &[("Referer", parent_url)])
        .await?;
    let found = extract::manifest_urls(&html)
        .into_iter()
        .map(|u| RawCandidate::new(u.clone(), u, frame_url))
        .collect();
    Ok((found, extract::frame_src(&html, frame_url, 0)))
}

/// RapidCloud-style resolution: pull the opaque player id out of the frame
/// page, then ask the sibling `getSources` endpoints for stream sources.
/// The second endpoint is only tried when the first yields no manifests.
async fn proxy_token_candidates<F: PageFetcher + ?Sized>(
    fetcher: &F,
    config: &ResolverConfig,
    frame_url: &str,
) -> Result<Vec<RawCandidate>> {
    let origin = Url::parse(frame_url)
        .map(|u| u.origin().ascii_serialization())
        .map_err(|_| ResolveError::ExtractionMiss("frame origin"))?;

    let html = fetcher
        .fetch_text(frame_url, &[("Referer", frame_url)])
        .await?;
    let id =
        extract::embed_id(&html).ok_or(ResolveError::ExtractionMiss("proxy player id"))?;
    let id = urlencoding::encode(&id).into_owned();

    let endpoints = [
        format!("{origin}/ajax/embed-4/getSources?id={id}"),
        format!("{origin}/ajax/embed/getSources?id={id}"),
    ];
    let headers = [
        ("X-Requested-With", "XMLHttpRequest"),
        ("Referer", frame_url),
        ("Origin", origin.as_str()),
    ];

    for endpoint in &endpoints {
        match fetcher.fetch_json(endpoint, &headers).await {
            Ok(json) => {
                let found = harvest_sources(&json, frame_url);
                if !found.is_empty() {
                    return Ok(found);
                }
                debug!(%endpoint, "no manifest entries in response");
            }
            Err(err) => debug!(%endpoint, %err, "getSources request failed"),
        }
    }

    Ok(Vec::new())
}

/// Manifest URLs in a `getSources` response: a bare string, an `hls`
/// field, or a `sources` / `data.sources` array of `{file|url,
/// label|quality}` items.
fn harvest_sources(json: &Value, referer: &str) -> Vec<RawCandidate> {
    let mut out = Vec::new();
    let mut push = |url: Option<&str>, label: Option<&str>| {
        if let Some(url) = url {
            if extract::is_manifest_url(url) {
                out.push(RawCandidate::new(url, label.unwrap_or("Stream"), referer));
            }
        }
    };

    if let Some(s) = json.as_str() {
        push(Some(s), None);
        return out;
    }

    push(json.get("hls").and_then(Value::as_str), Some("HLS"));

    let sources = json
        .get("sources")
        .and_then(Value::as_array)
        .or_else(|| json.pointer("/data/sources").and_then(Value::as_array));
    for item in sources.into_iter().flatten() {
        push(
            item.get("file")
                .or_else(|| item.get("url"))
                .and_then(Value::as_str),
            item.get("label")
                .or_else(|| item.get("quality"))
                .and_then(Value::as_str),
        );
    }

    out
}
