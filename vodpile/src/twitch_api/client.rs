//! HTTP transport and the paging loop over a channel's video listing.

use crate::twitch_api::config::TwitchConfig;
use crate::twitch_api::types::{FetchError, StopReason};
use crate::twitch_api::videos::{VideoSet, decode_videos};
use bytes::{Buf, Bytes};
use eyre::Context;
use http::header::{ACCEPT, CONTENT_LENGTH, HeaderName};
use http::{Method, Request, Response, StatusCode};
use std::future::Future;
use tracing::instrument;

/// Error type produced by [`HttpClient`] implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Header carrying the registered application ID.
pub const CLIENT_ID: HeaderName = HeaderName::from_static("client-id");

/// Anything that can execute an HTTP request.
///
/// [`TwitchClient`] never builds its own transport; it is handed one of these. Timeouts,
/// proxies, TLS settings and the like are the implementation's business.
pub trait HttpClient {
    /// Sends `request` and returns the response with its body fully read.
    fn execute(
        &self,
        request: Request<()>,
    ) -> impl Future<Output = Result<Response<Bytes>, BoxError>> + Send;
}

impl HttpClient for reqwest::Client {
    async fn execute(&self, request: Request<()>) -> Result<Response<Bytes>, BoxError> {
        let (parts, ()) = request.into_parts();
        let response = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Client for listing the videos of Twitch channels.
///
/// Pages are fetched strictly one after another, and the body of one page is read and
/// dropped before the next request goes out.
#[derive(Debug, Clone)]
pub struct TwitchClient<C = reqwest::Client> {
    /// HTTP client for API requests
    client: C,
    config: TwitchConfig,
}

impl<C> TwitchClient<C>
where
    C: HttpClient,
{
    pub fn new(client: C, config: TwitchConfig) -> Self {
        Self { client, config }
    }

    /// Fetches metadata for every video in `channel`.
    ///
    /// Pages through `/channels/:channel/videos` until the listing appears exhausted (see
    /// the [module docs](crate::twitch_api) for the exact rules) and merges all pages by
    /// video ID, later pages winning.
    ///
    /// # Errors
    ///
    /// Fails on the first transport error, non-200 response, or undecodable body. There
    /// are no retries and no partial results; [`FetchError::find`] tells the failures
    /// apart.
    #[instrument(skip(self))]
    pub async fn fetch_video_list(&self, channel: &str) -> eyre::Result<VideoSet> {
        let mut vids = VideoSet::with_capacity(500);
        let result = self.fetch_into(channel, &mut vids).await;
        tracing::info!(unique = vids.len(), "total videos parsed");
        result.with_context(|| format!("fetch video list for channel {channel}"))?;
        Ok(vids)
    }

    async fn fetch_into(&self, channel: &str, vids: &mut VideoSet) -> Result<(), FetchError> {
        let first_page = self.config.first_page_url(channel);
        let mut strategy = self.config.page_strategy();
        let mut pages = 0;
        loop {
            let url = strategy.page_url(&first_page);
            let body = self.fetch_page(&url).await?;
            let page = decode_videos(body.reader(), vids)?;
            pages += 1;

            tracing::debug!(
                count = page.count,
                total = page.total,
                next = page.next.as_str(),
                unique = vids.len(),
                "merged page"
            );

            let stop = strategy.stop_reason(&page, vids.len()).or_else(|| {
                self.config
                    .max_pages
                    .filter(|&max| pages >= max)
                    .map(|_| StopReason::PageLimit)
            });
            if let Some(reason) = stop {
                tracing::debug!(?reason, pages, "done paging");
                return Ok(());
            }

            strategy.advance(&page);
        }
    }

    /// GETs one listing page and returns its body.
    ///
    /// Anything but `200 OK` is an error; the body of such a response is discarded.
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    pub(crate) async fn fetch_page(&self, url: &str) -> Result<Bytes, FetchError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header(ACCEPT, self.config.accept.as_str())
            .header(CLIENT_ID, self.config.client_id.as_str())
            .body(())
            .map_err(|source| FetchError::InvalidRequest {
                url: url.to_string(),
                source,
            })?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response.into_body();
        tracing::info!(
            url,
            content_length = content_length.unwrap_or(body.len() as u64),
            "fetched page"
        );

        Ok(body)
    }
}
