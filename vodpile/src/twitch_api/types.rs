//! Shared types for paging through a channel's video listing.

use http::StatusCode;

/// The ways a channel fetch can fail.
///
/// None of these are retried. Callers receive them wrapped in an [`eyre::Report`]; use
/// [`FetchError::find`] to get at the failure class.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request for `url` could not be assembled (bad URL or header value).
    #[error("build request for {url}")]
    InvalidRequest {
        url: String,
        #[source]
        source: http::Error,
    },
    /// The HTTP client failed to complete the request.
    #[error("send request to Twitch API: {url}")]
    Transport {
        url: String,
        #[source]
        source: crate::twitch_api::BoxError,
    },
    /// Twitch answered with something other than `200 OK`.
    #[error("Twitch API request for {url} failed with HTTP status {status}")]
    Status { url: String, status: StatusCode },
    /// The response body was not a valid video listing.
    #[error("decode Twitch API video listing")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Finds the `FetchError` that caused `report`, if any.
    pub fn find(report: &eyre::Report) -> Option<&FetchError> {
        report.chain().find_map(|e| e.downcast_ref::<FetchError>())
    }
}

/// What one response body contributed, as reported by [`decode_videos`].
///
/// [`decode_videos`]: crate::twitch_api::decode_videos
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSummary {
    /// Number of videos decoded from the body, duplicates included.
    pub count: usize,
    /// The channel total last reported by the body, truncated toward zero.
    pub total: usize,
    /// The last-seen next-page URL, or empty if there was none.
    pub next: String,
}

/// Why paging stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page had no videos in it.
    EmptyPage,
    /// We hold at least as many unique videos as the API says the channel has.
    TotalReached,
    /// Cursor paging, and the API did not tell us where the next page is.
    NoNextPage,
    /// The configured maximum number of pages has been fetched.
    PageLimit,
}

/// Where the next page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStrategy {
    /// Page URLs are assembled locally; `offset` grows by `limit` after every page.
    Offset { limit: u32, offset: u32 },
    /// Page URLs are taken from the previous page's `_links.next`.
    ///
    /// `next_url` is `None` until the first page has been fetched.
    Cursor { next_url: Option<String> },
}

impl PageStrategy {
    pub fn offset(limit: u32) -> Self {
        Self::Offset { limit, offset: 0 }
    }

    pub fn cursor() -> Self {
        Self::Cursor { next_url: None }
    }

    /// The URL of the page to fetch next, given the URL of the very first page.
    pub fn page_url(&self, first_page: &str) -> String {
        match self {
            Self::Offset { offset: 0, .. } | Self::Cursor { next_url: None } => {
                first_page.to_string()
            }
            Self::Offset { offset, .. } => format!("{first_page}&offset={offset}"),
            Self::Cursor {
                next_url: Some(next),
            } => next.clone(),
        }
    }

    /// Decides whether paging is over after merging `page`, with `unique` videos held.
    ///
    /// The reported total may be stale in either direction, so no single signal is
    /// trusted on its own; any one of them ends the fetch.
    pub fn stop_reason(&self, page: &PageSummary, unique: usize) -> Option<StopReason> {
        if page.count == 0 {
            return Some(StopReason::EmptyPage);
        }
        if unique >= page.total {
            return Some(StopReason::TotalReached);
        }
        if matches!(self, Self::Cursor { .. }) && page.next.is_empty() {
            return Some(StopReason::NoNextPage);
        }
        None
    }

    /// Moves on to the page after `page`.
    pub fn advance(&mut self, page: &PageSummary) {
        match self {
            Self::Offset { limit, offset } => *offset += *limit,
            Self::Cursor { next_url } => *next_url = Some(page.next.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIRST: &str = "https://api.twitch.tv/kraken/channels/gsl/videos?limit=100";

    fn summary(count: usize, total: usize, next: &str) -> PageSummary {
        PageSummary {
            count,
            total,
            next: next.to_string(),
        }
    }

    #[test]
    fn offset_urls_advance_by_limit() {
        let mut strategy = PageStrategy::offset(100);
        let page = summary(100, 1000, "");
        let mut urls = Vec::new();
        for _ in 0..3 {
            urls.push(strategy.page_url(FIRST));
            strategy.advance(&page);
        }
        assert_eq!(
            urls,
            vec![
                FIRST.to_string(),
                format!("{FIRST}&offset=100"),
                format!("{FIRST}&offset=200"),
            ]
        );
    }

    #[test]
    fn cursor_follows_next_link() {
        let mut strategy = PageStrategy::cursor();
        assert_eq!(strategy.page_url(FIRST), FIRST);

        let next = "https://api.twitch.tv/kraken/channels/gsl/videos?limit=100&offset=100";
        strategy.advance(&summary(100, 1000, next));
        assert_eq!(strategy.page_url(FIRST), next);
    }

    #[test]
    fn empty_page_stops_regardless_of_total() {
        for strategy in [PageStrategy::offset(100), PageStrategy::cursor()] {
            assert_eq!(
                strategy.stop_reason(&summary(0, 5000, "https://next"), 0),
                Some(StopReason::EmptyPage)
            );
        }
    }

    #[test]
    fn reaching_total_stops() {
        let strategy = PageStrategy::offset(100);
        assert_eq!(
            strategy.stop_reason(&summary(100, 250, ""), 250),
            Some(StopReason::TotalReached)
        );
        // the reported total can shrink below what we already hold
        assert_eq!(
            strategy.stop_reason(&summary(100, 200, ""), 250),
            Some(StopReason::TotalReached)
        );
        assert_eq!(strategy.stop_reason(&summary(100, 251, ""), 250), None);
    }

    #[test]
    fn missing_next_only_stops_cursor_paging() {
        let page = summary(100, 1000, "");
        assert_eq!(
            PageStrategy::cursor().stop_reason(&page, 100),
            Some(StopReason::NoNextPage)
        );
        assert_eq!(PageStrategy::offset(100).stop_reason(&page, 100), None);
        assert_eq!(
            PageStrategy::cursor().stop_reason(&summary(100, 1000, "https://next"), 100),
            None
        );
    }

    #[test]
    fn find_digs_through_context() {
        use eyre::WrapErr;

        let err: Result<(), FetchError> = Err(FetchError::Status {
            url: FIRST.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        });
        let report = err.wrap_err("fetch video list").unwrap_err();
        assert!(matches!(
            FetchError::find(&report),
            Some(FetchError::Status { status, .. }) if *status == StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(FetchError::find(&eyre::eyre!("unrelated")).is_none());
    }
}
