//! Twitch Videos API types and the page decoder.

use crate::twitch_api::types::{FetchError, PageSummary};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;

/// Every video fetched so far, keyed by [`Video::id`].
pub type VideoSet = HashMap<String, Video>;

/// Response structure for `GET /channels/:channel/videos`.
///
/// Fields that are missing or `null` in a response decode to their defaults.
///
/// See: <https://github.com/justintv/Twitch-API/blob/master/v2_resources/videos.md#get-channelschannelvideos>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoListResponse {
    /// The number of videos the channel has in total.
    ///
    /// Twitch sends this as a JSON number that is not always an integer.
    #[serde(rename = "_total", deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(rename = "_links", deserialize_with = "null_as_default")]
    pub links: PageLinks,
    /// The videos on this page.
    #[serde(deserialize_with = "null_as_default")]
    pub videos: Vec<Video>,
}

impl VideoListResponse {
    /// [`Self::total`] truncated toward zero. Negative and NaN totals count as zero.
    pub fn reported_total(&self) -> usize {
        // float-to-int `as` truncates and saturates
        self.total as usize
    }
}

/// Navigation links of a listing page.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
    /// URL of the next page. Absent or empty on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// A `video` resource: one past broadcast or highlight.
///
/// Only the fields vodpile looks at are typed out. Everything else Twitch sends along is
/// kept in [`Video::extra`] so that re-encoding a video does not lose anything. Every typed
/// field is written back out, as `null` when Twitch did not send it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    /// The ID that Twitch uses to uniquely identify the video, e.g. `a526475935`.
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// When the broadcast was recorded, exactly as Twitch sent it.
    ///
    /// Usually RFC 3339; see [`Video::recorded_timestamp`].
    #[serde(deserialize_with = "null_as_default")]
    pub recorded_at: String,
    #[serde(rename = "_links", deserialize_with = "null_as_default")]
    pub links: VideoLinks,
    /// HTML markup for embedding the video player.
    pub embed: Option<String>,
    /// Where the video can be watched.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub views: Option<f64>,
    /// URL of a preview image.
    #[serde(deserialize_with = "null_as_default")]
    pub preview: String,
    /// Duration in seconds.
    #[serde(deserialize_with = "null_as_default")]
    pub length: f64,
    pub game: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Video {
    /// [`Self::recorded_at`] as a timestamp, if it parses as one.
    pub fn recorded_timestamp(&self) -> Option<Timestamp> {
        self.recorded_at.parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoLinks {
    /// API URL of this video.
    #[serde(rename = "self", deserialize_with = "null_as_default")]
    pub self_url: String,
    /// API URL of the channel the video belongs to.
    #[serde(deserialize_with = "null_as_default")]
    pub channel: String,
}

/// Decodes `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Decodes a listing response body from `reader` and merges its videos into `vids`.
///
/// The body may hold several concatenated JSON objects; all of them are decoded, and only
/// the end of the input finishes the page. Videos are merged as soon as their object has
/// been decoded, replacing any earlier video with the same ID.
///
/// On a decode error, videos from objects that were fully decoded before the error stay
/// in `vids`.
pub fn decode_videos<R: io::Read>(
    reader: R,
    vids: &mut VideoSet,
) -> Result<PageSummary, FetchError> {
    let mut summary = PageSummary::default();
    let messages = serde_json::Deserializer::from_reader(reader).into_iter::<VideoListResponse>();
    for message in messages {
        let message = message?;
        summary.total = message.reported_total();
        summary.next = message.links.next.unwrap_or_default();
        for video in message.videos {
            vids.insert(video.id.clone(), video);
            summary.count += 1;
        }
    }
    Ok(summary)
}

/// Turns a fetched [`VideoSet`] into a list, ordered by video ID.
pub fn into_video_list(vids: VideoSet) -> Vec<Video> {
    let mut videos: Vec<_> = vids.into_values().collect();
    videos.sort_by(|a, b| a.id.cmp(&b.id));
    videos
}
