//! vixstream - resolves VixSrc embed pages into playable HLS streams.
//!
//! Takes a catalog reference (TMDB id, movie or series + season/episode)
//! and walks the embed page through a chain of extraction strategies until
//! a verified `#EXTM3U` manifest URL is found, returning ranked
//! [`StreamDescriptor`]s with the playback headers the CDN expects.
//!
//! # Example
//!
//! ```rust,no_run
//! use vixstream::{MediaReference, Resolver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let resolver = Resolver::new()?;
//!     let streams = resolver.resolve(&MediaReference::movie("786892")).await;
//!     for stream in &streams {
//!         println!("{} -> {}", stream.quality, stream.url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod media;
pub mod resolver;
pub mod verify;

pub use config::{ResolutionMode, ResolverConfig};
pub use descriptor::{MediaFormat, RawCandidate, StreamDescriptor, StreamHeaders};
pub use error::{FetchError, ResolveError};
pub use fetch::{HttpFetcher, PageFetcher};
pub use media::{MediaKind, MediaReference};
pub use resolver::Resolver;

/// Version of vixstream
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
