use clap::Parser;
use eyre::Context;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vodpile::fetch_channel_videos;
use vodpile::twitch_api::config::{DEFAULT_API_BASE, DEFAULT_CLIENT_ID, DEFAULT_PAGE_LIMIT};
use vodpile::twitch_api::{Pagination, TwitchConfig};

/// Fetches the video listing of a Twitch channel and writes it out as a JSON array.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Name of Twitch channel to fetch (e.g. 'gsl')
    #[arg(long)]
    channel: String,

    /// Output file; if absent, prints to stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of videos to request per page
    #[arg(
        long,
        default_value_t = DEFAULT_PAGE_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    limit: u32,

    /// How to find the next page
    #[arg(long, value_enum, default_value_t = Pagination::Offset)]
    pagination: Pagination,

    /// Only list past broadcasts, not highlights
    #[arg(long)]
    broadcasts: bool,

    /// Stop after this many pages (useful for debugging)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[arg(long, env = "VODPILE_CLIENT_ID", default_value = DEFAULT_CLIENT_ID)]
    client_id: String,

    #[arg(long, env = "VODPILE_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // stdout may be the JSON output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let args = Args::parse();

    let config = TwitchConfig {
        api_base: args.api_base,
        client_id: args.client_id,
        limit: args.limit,
        pagination: args.pagination,
        broadcasts: args.broadcasts,
        max_pages: args.max_pages,
        ..TwitchConfig::default()
    };

    if let Some(path) = &args.output {
        tracing::info!(path = %path.display(), "writing to output file");
    }

    let videos =
        fetch_channel_videos(&args.channel, config, Duration::from_secs(args.timeout)).await?;
    tracing::info!("Got {} unique videos.", videos.len());

    let mut json = serde_json::to_vec(&videos).context("encode videos as JSON")?;
    json.push(b'\n');

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &json)
                .await
                .with_context(|| format!("write {}", path.display()))?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&json).await.context("write to stdout")?;
            stdout.flush().await.context("flush stdout")?;
        }
    }

    Ok(())
}
