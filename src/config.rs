//! Resolver configuration.
//!
//! All tunables (base host, locale, timeouts, header values, proxy-host
//! hints, quality vocabulary) live in one immutable value passed into the
//! pipeline at construction, so tests can swap hosts and timeouts without
//! touching globals.

use std::time::Duration;

/// Desktop Chrome User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Accept-Language biased to the Italian catalog.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "it-IT,it;q=0.9,en-US;q=0.8,en;q=0.7";

/// How the resolver walks a single embed URL.
///
/// The two modes are alternatives, not tiers: an embed URL is resolved
/// with exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Generic staged chain: in-page scan, nested frames (depth 2),
    /// proxy-host token endpoints.
    #[default]
    FallbackChain,
    /// VixSrc-native token/expiry synthesis from inline player script,
    /// including the Inertia version handshake for frame-wrapper pages.
    NativeSynthesis,
}

/// Immutable configuration for a [`crate::Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Embed host, no trailing slash (e.g. `https://vixsrc.to`).
    pub base_host: String,
    /// Value of the `lang` query parameter on the preferred embed variant.
    pub lang: String,
    pub user_agent: String,
    pub accept_language: String,
    /// Wall-clock bound for page and JSON fetches.
    pub page_timeout: Duration,
    /// Wall-clock bound for manifest verification probes.
    pub probe_timeout: Duration,
    /// Host fragments identifying RapidCloud-style proxy frames.
    pub proxy_host_hints: Vec<String>,
    /// Known quality labels, best first.
    pub quality_order: Vec<String>,
    pub mode: ResolutionMode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_host: "https://vixsrc.to".to_string(),
            lang: "it".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            page_timeout: Duration::from_secs(15),
            probe_timeout: Duration::from_secs(8),
            proxy_host_hints: [
                "rabbitstream",
                "rapid-cloud",
                "vizcloud",
                "vidcloud",
                "mzzcloud",
                "rcp",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            quality_order: ["2160p", "4K", "1440p", "1080p", "720p", "480p", "360p"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            mode: ResolutionMode::FallbackChain,
        }
    }
}

impl ResolverConfig {
    /// Default configuration with native token synthesis enabled.
    #[must_use]
    pub fn native() -> Self {
        Self {
            mode: ResolutionMode::NativeSynthesis,
            ..Self::default()
        }
    }

    /// Base host without any trailing slash, for path templating.
    #[must_use]
    pub fn host(&self) -> &str {
        self.base_host.trim_end_matches('/')
    }
}
