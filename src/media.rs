//! Media references and embed-URL candidate construction.

use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;

/// What kind of catalog entry a [`MediaReference`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

/// A catalog identifier plus enough context to address one playable item.
///
/// Series references need both a season and an episode; without them no
/// embed URL can be built and resolution yields an empty result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub id: String,
    pub kind: MediaKind,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl MediaReference {
    pub fn movie(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: MediaKind::Movie,
            season: None,
            episode: None,
        }
    }

    pub fn episode(id: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            id: id.into(),
            kind: MediaKind::Series,
            season: Some(season),
            episode: Some(episode),
        }
    }
}

/// Embed URLs for `reference`, most preferred first: the localized variant
/// (`?lang=…`) ahead of the plain one.
///
/// Returns an empty vec when a series reference is missing its season or
/// episode (or either is zero). That is the normal "insufficient
/// parameters" outcome, not an error.
pub fn embed_candidates(reference: &MediaReference, config: &ResolverConfig) -> Vec<String> {
    let host = config.host();
    let id = urlencoding::encode(&reference.id);

    let path = match reference.kind {
        MediaKind::Movie => format!("{host}/movie/{id}"),
        MediaKind::Series => {
            let (Some(season), Some(episode)) = (reference.season, reference.episode) else {
                return Vec::new();
            };
            if season == 0 || episode == 0 {
                return Vec::new();
            }
            format!("{host}/tv/{id}/{season}/{episode}")
        }
    };

    vec![format!("{path}?lang={}", config.lang), path]
}
