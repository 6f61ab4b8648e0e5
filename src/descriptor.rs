//! Output stream descriptors and their assembly from raw candidates.

use serde::Serialize;
use url::Url;

use crate::config::ResolverConfig;
use crate::extract;

/// A not-yet-verified manifest URL plus the page it was discovered from
/// (used as the playback Referer) and a label for quality inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub url: String,
    pub label: String,
    pub referer: String,
}

impl RawCandidate {
    pub fn new(
        url: impl Into<String>,
        label: impl Into<String>,
        referer: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            referer: referer.into(),
        }
    }
}

/// Whether a descriptor points at a playable manifest or at an embed page
/// the caller should open externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Manifest,
    External,
}

/// Playback headers. Referer/Origin must match the page that revealed the
/// URL or the upstream CDN's hotlink protection rejects the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamHeaders {
    #[serde(rename = "Referer")]
    pub referer: String,
    #[serde(rename = "User-Agent")]
    pub user_agent: String,
    #[serde(rename = "Origin", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// The sole externally visible output of a resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDescriptor {
    pub name: String,
    pub title: String,
    pub url: String,
    pub quality: String,
    #[serde(rename = "mediaFormat")]
    pub media_format: MediaFormat,
    pub headers: StreamHeaders,
}

/// Deduplicate a candidate pool by URL, preserving first-seen order.
pub fn dedupe(pool: Vec<RawCandidate>) -> Vec<RawCandidate> {
    let mut seen = std::collections::HashSet::new();
    pool.into_iter()
        .filter(|c| seen.insert(c.url.clone()))
        .collect()
}

/// Build a manifest descriptor for a verified candidate.
pub fn direct_descriptor(candidate: &RawCandidate, config: &ResolverConfig) -> StreamDescriptor {
    let quality = extract::infer_quality(
        if candidate.label.is_empty() {
            &candidate.url
        } else {
            &candidate.label
        },
        &config.quality_order,
    );
    let origin = Url::parse(&candidate.url)
        .map(|u| u.origin().ascii_serialization())
        .unwrap_or_else(|_| config.host().to_string());

    let title = if quality == "Unknown" {
        "Stream • ITA".to_string()
    } else {
        format!("{quality} • ITA")
    };

    StreamDescriptor {
        name: "VixSrc (ITA • Direct)".to_string(),
        title,
        url: candidate.url.clone(),
        quality,
        media_format: MediaFormat::Manifest,
        headers: StreamHeaders {
            referer: format!("{origin}/"),
            user_agent: config.user_agent.clone(),
            origin: Some(origin),
        },
    }
}

/// Last-resort descriptor pointing at the embed page itself.
pub fn external_descriptor(embed_url: &str, config: &ResolverConfig) -> StreamDescriptor {
    StreamDescriptor {
        name: "VixSrc (Embed ITA)".to_string(),
        title: "Apri Player VixSrc (ITA)".to_string(),
        url: embed_url.to_string(),
        quality: "Unknown".to_string(),
        media_format: MediaFormat::External,
        headers: StreamHeaders {
            referer: format!("{}/", config.host()),
            user_agent: config.user_agent.clone(),
            origin: Some(config.host().to_string()),
        },
    }
}

/// Sort descriptors descending by quality rank. Stable, so equal-quality
/// entries keep their discovery order.
pub fn rank_by_quality(descriptors: &mut [StreamDescriptor]) {
    descriptors.sort_by_key(|d| std::cmp::Reverse(extract::quality_rank(&d.quality)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let pool = vec![
            RawCandidate::new("https://x/a.m3u8", "1080p", "https://e/1"),
            RawCandidate::new("https://x/b.m3u8", "720p", "https://e/1"),
            RawCandidate::new("https://x/a.m3u8", "other", "https://e/2"),
        ];
        let unique = dedupe(pool);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].label, "1080p");
    }

    #[test]
    fn direct_descriptor_uses_stream_origin_for_headers() {
        let config = ResolverConfig::default();
        let candidate = RawCandidate::new(
            "https://cdn.example/v/out.m3u8?t=1",
            "1080p",
            "https://vixsrc.to/movie/1",
        );
        let desc = direct_descriptor(&candidate, &config);
        assert_eq!(desc.quality, "1080p");
        assert_eq!(desc.media_format, MediaFormat::Manifest);
        assert_eq!(desc.headers.referer, "https://cdn.example/");
        assert_eq!(desc.headers.origin.as_deref(), Some("https://cdn.example"));
        assert_eq!(desc.title, "1080p • ITA");
    }

    #[test]
    fn direct_descriptor_falls_back_to_url_for_quality() {
        let config = ResolverConfig::default();
        let candidate = RawCandidate::new("https://cdn.example/720p/out.m3u8", "", "https://e/1");
        assert_eq!(direct_descriptor(&candidate, &config).quality, "720p");
    }

    #[test]
    fn external_descriptor_points_at_embed() {
        let config = ResolverConfig::default();
        let desc = external_descriptor("https://vixsrc.to/movie/1", &config);
        assert_eq!(desc.media_format, MediaFormat::External);
        assert_eq!(desc.url, "https://vixsrc.to/movie/1");
        assert_eq!(desc.headers.referer, "https://vixsrc.to/");
    }

    #[test]
    fn ranking_is_stable_for_equal_quality() {
        let config = ResolverConfig::default();
        let mut descriptors = vec![
            direct_descriptor(
                &RawCandidate::new("https://x/720-first.m3u8", "720p", "r"),
                &config,
            ),
            direct_descriptor(
                &RawCandidate::new("https://x/1080.m3u8", "1080p", "r"),
                &config,
            ),
            direct_descriptor(
                &RawCandidate::new("https://x/720-second.m3u8", "720p", "r"),
                &config,
            ),
        ];
        rank_by_quality(&mut descriptors);
        assert_eq!(descriptors[0].quality, "1080p");
        assert_eq!(descriptors[1].url, "https://x/720-first.m3u8");
        assert_eq!(descriptors[2].url, "https://x/720-second.m3u8");
    }

    #[test]
    fn wire_schema_field_names_are_stable() {
        let config = ResolverConfig::default();
        let json = serde_json::to_value(external_descriptor("https://vixsrc.to/movie/1", &config))
            .unwrap();
        assert_eq!(json["mediaFormat"], "external");
        assert!(json["headers"]["Referer"].is_string());
        assert!(json["headers"]["User-Agent"].is_string());
    }
}
