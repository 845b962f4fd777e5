use clap::Parser;
use eyre::Context;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vodpile::titles::parse_video_titles;
use vodpile::twitch_api::Video;
use vodpile::{write_parsed_index, write_video_index};

/// Prints `id:title` for every video in a file written by vodpile-fetch.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Path to JSON file to parse
    #[arg(long)]
    input: PathBuf,

    /// Print titles placed in the GSL League/Group/Part/Match/Set hierarchy instead of the
    /// raw titles. Videos whose title is not recognized are reported on stderr.
    #[arg(long)]
    parsed: bool,
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let args = Args::parse();

    let json =
        std::fs::read(&args.input).with_context(|| format!("read {}", args.input.display()))?;
    let videos: Vec<Video> = serde_json::from_slice(&json)
        .with_context(|| format!("parse {} as a list of videos", args.input.display()))?;
    tracing::debug!(count = videos.len(), "loaded videos");

    let out = io::BufWriter::new(io::stdout().lock());
    if !args.parsed {
        write_video_index(&videos, out).context("write video index")?;
        return Ok(());
    }

    let index = parse_video_titles(&videos);
    tracing::info!(
        parsed = index.parsed.len(),
        unparsed = index.unparsed.len(),
        "parsed video titles"
    );
    write_parsed_index(&index, out).context("write parsed video index")?;
    Ok(())
}
