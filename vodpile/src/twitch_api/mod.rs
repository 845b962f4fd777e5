//! Twitch Kraken v2 client for listing every video of a channel.
//!
//! The listing endpoint (`/channels/:channel/videos`) is paginated, and its paging metadata
//! is not trustworthy: the reported `_total` can lag behind or run ahead of what the pages
//! actually contain, because the channel owner may add or delete videos while we page
//! through them. The client therefore merges every page into one [`VideoSet`] keyed by
//! video ID and stops as soon as *any* of these holds:
//!
//! 1. the last page contained no videos,
//! 2. we hold at least as many unique videos as the API reports for the channel,
//! 3. (cursor paging only) the API gave us no next-page URL,
//! 4. the configured page cap was reached.
//!
//! # Paging strategies
//!
//! [`PageStrategy::Offset`] assembles page URLs locally by bumping `offset` by the page
//! size. This is the default, because the `next` URLs Twitch hands out drop some of the
//! request parameters (such as `broadcasts`). [`PageStrategy::Cursor`] follows the
//! server-provided `_links.next` instead.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use vodpile::twitch_api::{TwitchClient, TwitchConfig, into_video_list};
//!
//! # async fn example() -> eyre::Result<()> {
//! let client = TwitchClient::new(reqwest::Client::new(), TwitchConfig::default());
//! let videos = client.fetch_video_list("gsl").await?;
//! for video in into_video_list(videos) {
//!     println!("{}: {}", video.id, video.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod types;
pub mod videos;

pub use client::{BoxError, HttpClient, TwitchClient};
pub use config::{Pagination, TwitchConfig};
pub use types::{FetchError, PageStrategy, PageSummary, StopReason};
pub use videos::{
    PageLinks, Video, VideoLinks, VideoListResponse, VideoSet, decode_videos, into_video_list,
};
