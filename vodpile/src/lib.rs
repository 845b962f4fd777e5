use crate::titles::TitleIndex;
use crate::twitch_api::{TwitchClient, TwitchConfig, Video, into_video_list};
use eyre::Context;
use std::io;
use std::time::Duration;

pub mod titles;
pub mod twitch_api;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches metadata for every video in `channel` using a fresh HTTP client.
///
/// Any single request that takes longer than `timeout` fails the whole fetch. The videos
/// come back ordered by ID.
pub async fn fetch_channel_videos(
    channel: &str,
    config: TwitchConfig,
    timeout: Duration,
) -> eyre::Result<Vec<Video>> {
    if channel.is_empty() {
        eyre::bail!("empty channel name; cannot fetch");
    }

    let http = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("build HTTP client")?;

    let client = TwitchClient::new(http, config);
    let vids = client.fetch_video_list(channel).await?;
    Ok(into_video_list(vids))
}

/// Writes one `id:title` line per video to `out`.
pub fn write_video_index<W: io::Write>(videos: &[Video], mut out: W) -> io::Result<()> {
    for video in videos {
        writeln!(out, "{}:{}", video.id, video.title)?;
    }
    out.flush()
}

/// Writes one `id:title` line per video whose title was recognized, with the title
/// rewritten from its place in the hierarchy.
pub fn write_parsed_index<W: io::Write>(index: &TitleIndex<'_>, mut out: W) -> io::Result<()> {
    for (video, parsed) in &index.parsed {
        writeln!(out, "{}:{}", video.id, parsed.pretty(0))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn video_index_lines() {
        let videos: Vec<Video> = serde_json::from_str(
            r#"[
                {"_id": "a526475935", "title": "Code S Group A Part 1", "length": 7245},
                {"_id": "a526475936", "title": "Code S Group A: Part 2"},
                {"_id": "v1"}
            ]"#,
        )
        .unwrap();

        let mut out = Vec::new();
        write_video_index(&videos, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a526475935:Code S Group A Part 1\n\
             a526475936:Code S Group A: Part 2\n\
             v1:\n"
        );
    }

    #[test]
    fn parsed_index_lines() {
        let videos: Vec<Video> = serde_json::from_str(
            r#"[
                {"_id": "a1", "title": "Code S Group A match1 set2.mp4"},
                {"_id": "a2", "title": "Opening ceremony"},
                {"_id": "a3", "title": "2014 GSL Season 1 Code A Group K"}
            ]"#,
        )
        .unwrap();
        let index = crate::titles::parse_video_titles(&videos);

        let mut out = Vec::new();
        write_parsed_index(&index, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a1:Code S Group A Match 1 Set 2\n\
             a3:Code A Group K\n"
        );
        assert_eq!(index.unparsed.len(), 1);
    }

    #[tokio::test]
    async fn empty_channel_is_rejected() {
        let err = fetch_channel_videos("", TwitchConfig::default(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty channel name"), "{err}");
    }
}
