//! The resolution pipeline: embed candidates in, ranked descriptors out.
//!
//! Embed variants and strategies run strictly sequentially (each step
//! depends on the previous one's discovered URLs); only verification of
//! the surviving candidates is batched concurrently.

mod chain;
mod native;

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::{ResolutionMode, ResolverConfig};
use crate::descriptor::{self, RawCandidate, StreamDescriptor};
use crate::error::FetchError;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::media::{self, MediaReference};
use crate::verify;

/// Resolves media references into playable stream descriptors.
///
/// Each call is fully self-contained: no cache, no state carried between
/// resolutions. [`Resolver::resolve`] is infallible; total exhaustion of
/// every strategy and variant degrades to an external-embed descriptor,
/// never an error.
pub struct Resolver<F: PageFetcher = HttpFetcher> {
    fetcher: F,
    config: Arc<ResolverConfig>,
}

impl Resolver<HttpFetcher> {
    /// Resolver with default configuration and a real HTTP fetcher.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Result<Self, FetchError> {
        let config = Arc::new(config);
        let fetcher = HttpFetcher::new(Arc::clone(&config))?;
        Ok(Self { fetcher, config })
    }
}

impl<F: PageFetcher> Resolver<F> {
    /// Resolver over a caller-supplied fetcher (the test seam).
    pub fn with_fetcher(config: ResolverConfig, fetcher: F) -> Self {
        Self {
            fetcher,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve `reference` into a ranked list of stream descriptors.
    ///
    /// Returns an empty list only for insufficient parameters (series
    /// without season/episode). Otherwise at least one descriptor comes
    /// back: verified manifests sorted best-quality-first, or the
    /// external-embed fallback for the last variant tried.
    pub async fn resolve(&self, reference: &MediaReference) -> Vec<StreamDescriptor> {
        let candidates = media::embed_candidates(reference, &self.config);
        let Some(last_embed) = candidates.last().cloned() else {
            info!(id = %reference.id, "insufficient parameters to build an embed URL");
            return Vec::new();
        };

        for embed_url in &candidates {
            let pool = match self.config.mode {
                ResolutionMode::FallbackChain => {
                    chain::collect(&self.fetcher, &self.config, embed_url).await
                }
                ResolutionMode::NativeSynthesis => {
                    native::collect(&self.fetcher, &self.config, embed_url).await
                }
            };
            let pool = match pool {
                Ok(pool) => pool,
                Err(err) => {
                    warn!(%embed_url, %err, "embed variant yielded no candidates");
                    continue;
                }
            };

            let descriptors = self.assemble(pool).await;
            if !descriptors.is_empty() {
                return descriptors;
            }
            debug!(%embed_url, "no verified stream, advancing to next variant");
        }

        vec![descriptor::external_descriptor(&last_embed, &self.config)]
    }

    /// Dedupe, verify concurrently, build and rank descriptors.
    async fn assemble(&self, pool: Vec<RawCandidate>) -> Vec<StreamDescriptor> {
        let unique = descriptor::dedupe(pool);
        if unique.is_empty() {
            return Vec::new();
        }
        debug!(candidates = unique.len(), "verifying candidate pool");

        let checks = unique
            .iter()
            .map(|c| verify::verify_manifest(&self.fetcher, &c.url, &c.referer));
        let results = join_all(checks).await;

        let mut descriptors: Vec<StreamDescriptor> = unique
            .iter()
            .zip(results)
            .filter_map(|(candidate, ok)| {
                ok.then(|| descriptor::direct_descriptor(candidate, &self.config))
            })
            .collect();

        descriptor::rank_by_quality(&mut descriptors);
        descriptors
    }
}
