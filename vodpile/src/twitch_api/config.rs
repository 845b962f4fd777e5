//! Static configuration for talking to the Twitch API.

use crate::twitch_api::types::PageStrategy;

/// Root of the Kraken REST API.
pub const DEFAULT_API_BASE: &str = "https://api.twitch.tv/kraken";

/// Media type that pins the response format to Kraken v2.
pub const DEFAULT_ACCEPT: &str = "application/vnd.twitchtv.v2+json";

/// Client ID registered for vodpile.
///
/// Public by nature: it identifies the application, it does not authenticate it.
pub const DEFAULT_CLIENT_ID: &str = "38hlgc6gs8kj60lo4r8c4j9m5g6ih94";

/// Largest page size Kraken accepts for the videos listing.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Which paging strategy to use; see [`PageStrategy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Pagination {
    /// Assemble page URLs locally with `offset=`.
    #[default]
    Offset,
    /// Follow the `_links.next` URL returned with each page.
    Cursor,
}

#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub api_base: String,
    /// Value of the `Accept` header sent with every request.
    pub accept: String,
    /// Value of the `Client-ID` header sent with every request.
    pub client_id: String,
    /// Page size, passed as `limit=`.
    pub limit: u32,
    pub pagination: Pagination,
    /// Only list past broadcasts, not highlights (`broadcasts=true`).
    pub broadcasts: bool,
    /// Stop after this many pages even if more seem to be available.
    pub max_pages: Option<usize>,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            limit: DEFAULT_PAGE_LIMIT,
            pagination: Pagination::default(),
            broadcasts: false,
            max_pages: None,
        }
    }
}

impl TwitchConfig {
    /// URL of the first page of `channel`'s video listing.
    ///
    /// The channel name is embedded as-is; callers are expected to pass a valid login.
    pub fn first_page_url(&self, channel: &str) -> String {
        let mut url = format!(
            "{}/channels/{channel}/videos?limit={}",
            self.api_base.trim_end_matches('/'),
            self.limit
        );
        if self.broadcasts {
            url.push_str("&broadcasts=true");
        }
        url
    }

    /// A fresh paging state, positioned at the first page.
    pub fn page_strategy(&self) -> PageStrategy {
        match self.pagination {
            Pagination::Offset => PageStrategy::offset(self.limit),
            Pagination::Cursor => PageStrategy::cursor(),
        }
    }
}
