//! Pure extraction functions over already-fetched HTML/JSON text.
//!
//! Nothing in this module performs I/O; the resolver chain feeds it page
//! bodies and interprets the findings (manifest URLs, nested frame
//! references, synthesis tokens, quality labels).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

static MANIFEST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>]+?\.m3u8(?:\?[^\s"'<>]*)?"#).unwrap()
});

static NUMERIC_QUALITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{3,4})P").unwrap());

static QUALITY_RANK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{3,4})p").unwrap());

// Opaque-id patterns for RapidCloud-style frames, tried in order.
static DATA_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)data-id=["']([A-Za-z0-9_-]{6,})["']"#).unwrap());
static ATTR_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\sid=["']([A-Za-z0-9_-]{6,})["']"#).unwrap());
static LOOSE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)id["'\s=:]+([A-Za-z0-9_-]{6,})"#).unwrap());
static QUERY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)getSources\?id=([A-Za-z0-9_-]{6,})").unwrap());

// Inline player-script fields for native token synthesis.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)['"]?token['"]?\s*:\s*['"]([A-Za-z0-9]+)['"]"#).unwrap());
static EXPIRES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)['"]?expires['"]?\s*:\s*['"]?(\d+)"#).unwrap());
static PLAYLIST_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)url\s*:\s*['"](https?://[^'"]+)['"]"#).unwrap());

static MANIFEST_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.m3u8(\?|$)").unwrap());

/// Whether a URL looks like it points at an HLS manifest.
pub fn is_manifest_url(url: &str) -> bool {
    MANIFEST_SUFFIX_RE.is_match(url)
}

/// All HTTP(S) manifest URLs in `text`, first-seen order, deduplicated.
pub fn manifest_urls(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    MANIFEST_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

/// The `src` of the Nth (zero-based) `<iframe>` in `html`, resolved to an
/// absolute URL against `base_url`.
pub fn frame_src(html: &str, base_url: &str, nth: usize) -> Option<String> {
    let selector = Selector::parse("iframe[src]").ok()?;
    let doc = Html::parse_document(html);
    let src = doc
        .select(&selector)
        .nth(nth)
        .and_then(|el| el.value().attr("src"))?
        .to_string();
    Some(resolve_href(&src, base_url))
}

/// Resolve a possibly-relative `href` against the page it came from.
/// Unparsable inputs pass through unchanged.
pub fn resolve_href(href: &str, base_url: &str) -> String {
    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Case-insensitive substring match of `url` against proxy-host hints.
pub fn is_proxy_host(url: &str, hints: &[String]) -> bool {
    let lower = url.to_lowercase();
    hints.iter().any(|h| lower.contains(h.as_str()))
}

/// Opaque player id embedded in a RapidCloud-style frame page.
/// Patterns are tried in order; the first match wins.
pub fn embed_id(html: &str) -> Option<String> {
    [&DATA_ID_RE, &ATTR_ID_RE, &LOOSE_ID_RE, &QUERY_ID_RE]
        .iter()
        .find_map(|re| re.captures(html))
        .map(|caps| caps[1].to_string())
}

/// Infer a quality label from free text (stream label or URL).
///
/// Checks membership in the configured vocabulary first, then falls back
/// to a bare `NNNp` match, else `"Unknown"`.
pub fn infer_quality(text: &str, vocab: &[String]) -> String {
    let upper = text.to_uppercase();
    for quality in vocab {
        if upper.contains(&quality.to_uppercase()) {
            return quality.clone();
        }
    }
    NUMERIC_QUALITY_RE
        .captures(&upper)
        .map_or_else(|| "Unknown".to_string(), |caps| format!("{}p", &caps[1]))
}

/// Numeric ordering key for a quality label: pixel height, `4K` counts as
/// 4000, anything unparsable as 0.
pub fn quality_rank(quality: &str) -> u32 {
    if let Some(caps) = QUALITY_RANK_RE.captures(quality) {
        return caps[1].parse().unwrap_or(0);
    }
    if quality.eq_ignore_ascii_case("4k") {
        4000
    } else {
        0
    }
}

/// Fields pulled out of an inline VixSrc player script, enough to
/// synthesize the final manifest URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistParams {
    pub token: String,
    pub expires: String,
    pub base_url: String,
    /// `canPlayFHD` capability flag: unlocks the 1080p rendition.
    pub can_play_fhd: bool,
}

impl PlaylistParams {
    /// Final manifest URL: token and expiry appended with `&` when the
    /// base already carries a query string, `?` otherwise.
    #[must_use]
    pub fn manifest_url(&self) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{}token={}&expires={}",
            self.base_url, sep, self.token, self.expires
        );
        if self.can_play_fhd {
            url.push_str("&h=1");
        }
        url
    }
}

/// Token, expiry and base playlist URL from inline script content.
/// All three are required; anything less is a miss.
pub fn playlist_params(html: &str) -> Option<PlaylistParams> {
    let token = TOKEN_RE.captures(html)?[1].to_string();
    let expires = EXPIRES_RE.captures(html)?[1].to_string();
    let base_url = PLAYLIST_URL_RE.captures(html)?[1].to_string();
    Some(PlaylistParams {
        token,
        expires,
        base_url,
        can_play_fhd: html.contains("canPlayFHD"),
    })
}

/// The Inertia page-state `version` field, read from the `data-page` JSON
/// attribute of a server-rendered page.
pub fn page_state_version(html: &str) -> Option<String> {
    let selector = Selector::parse("[data-page]").ok()?;
    let doc = Html::parse_document(html);
    let payload = doc
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("data-page"))?;
    let state: serde_json::Value = serde_json::from_str(payload).ok()?;
    state.get("version")?.as_str().map(ToString::to_string)
}
