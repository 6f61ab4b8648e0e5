//! VixSrc-native token/expiry synthesis.
//!
//! Two embed-page shapes exist. A direct embed already carries the player
//! script with the token triple. A frame-wrapper page first needs the
//! Inertia `version` from the request-a-title page, sent back as a header
//! when re-fetching the wrapper and its single nested frame; the frame
//! then carries the script. Either way the final manifest URL is the base
//! playlist URL with token and expiry appended.

use tracing::debug;

use crate::config::ResolverConfig;
use crate::descriptor::RawCandidate;
use crate::error::{ResolveError, Result};
use crate::extract::{self, PlaylistParams};
use crate::fetch::PageFetcher;

pub(crate) async fn collect<F: PageFetcher + ?Sized>(
    fetcher: &F,
    config: &ResolverConfig,
    embed_url: &str,
) -> Result<Vec<RawCandidate>> {
    let html = fetcher.fetch_text(embed_url, &[]).await?;

    if let Some(params) = extract::playlist_params(&html) {
        debug!(%embed_url, "direct embed shape");
        return Ok(vec![candidate(&params, embed_url)]);
    }

    if extract::frame_src(&html, embed_url, 0).is_none() {
        return Err(ResolveError::ExtractionMiss("player script or wrapper frame"));
    }
    debug!(%embed_url, "frame-wrapper shape");

    let version = fetch_inertia_version(fetcher, config).await?;
    let wrapper_html = fetcher
        .fetch_text(
            embed_url,
            &[("x-inertia", "true"), ("x-inertia-version", version.as_str())],
        )
        .await?;
    let frame_url = extract::frame_src(&wrapper_html, embed_url, 0)
        .ok_or(ResolveError::ExtractionMiss("wrapper frame"))?;

    let frame_html = fetcher
        .fetch_text(
            &frame_url,
            &[
                ("Referer", embed_url),
                ("x-inertia", "true"),
                ("x-inertia-version", version.as_str()),
            ],
        )
        .await?;
    let params = extract::playlist_params(&frame_html)
        .ok_or(ResolveError::ExtractionMiss("token/expiry/url triple"))?;

    Ok(vec![candidate(&params, &frame_url)])
}

/// The page the synthesis ran against becomes the playback Referer.
fn candidate(params: &PlaylistParams, page_url: &str) -> RawCandidate {
    let label = if params.can_play_fhd { "1080p" } else { "720p" };
    RawCandidate::new(params.manifest_url(), label, page_url)
}

/// Inertia page-state version from the request-a-title page.
async fn fetch_inertia_version<F: PageFetcher + ?Sized>(
    fetcher: &F,
    config: &ResolverConfig,
) -> Result<String> {
    let url = format!("{}/richiedi-un-titolo", config.host());
    let referer = format!("{}/", config.host());
    let html = fetcher
        .fetch_text(&url, &[("Referer", referer.as_str())])
        .await?;
    extract::page_state_version(&html).ok_or(ResolveError::ExtractionMiss("inertia version"))
}
