//! Manual smoke-test binary: resolve one reference, print the descriptors.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use vixstream::{MediaReference, Resolver, ResolverConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Movie,
    Series,
}

#[derive(Parser)]
#[command(name = "vixstream", version, about = "Resolve a VixSrc title into playable stream URLs")]
struct Cli {
    /// TMDB catalog id
    id: String,

    #[arg(long, value_enum, default_value = "movie")]
    kind: KindArg,

    /// Season number (series only)
    #[arg(long)]
    season: Option<u32>,

    /// Episode number (series only)
    #[arg(long)]
    episode: Option<u32>,

    /// Use native token synthesis instead of the generic fallback chain
    #[arg(long)]
    native: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let reference = match cli.kind {
        KindArg::Movie => MediaReference::movie(cli.id),
        KindArg::Series => {
            let (Some(season), Some(episode)) = (cli.season, cli.episode) else {
                bail!("series resolution needs both --season and --episode");
            };
            MediaReference::episode(cli.id, season, episode)
        }
    };

    let config = if cli.native {
        ResolverConfig::native()
    } else {
        ResolverConfig::default()
    };

    let resolver = Resolver::with_config(config)?;
    let streams = resolver.resolve(&reference).await;

    if streams.is_empty() {
        bail!("no embed candidate could be built (missing season/episode?)");
    }
    println!("{}", serde_json::to_string_pretty(&streams)?);
    Ok(())
}
