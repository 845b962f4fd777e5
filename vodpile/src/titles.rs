//! Sorting GSL broadcast titles into a League/Group/Part/Match/Set hierarchy.
//!
//! GSL names its past broadcasts in a handful of loosely consistent formats, for example
//! `2014 GSL Season 1 Code S Group A Part 1` or `Code A Group K match2 set3.mp4`. Each
//! [`TitleFormat`] recognizes one of them and says which hierarchy levels its captures
//! fill in.

use crate::twitch_api::Video;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// One level of the broadcast hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Level {
    League,
    Group,
    Part,
    Match,
    Set,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::League => "League",
            Level::Group => "Group",
            Level::Part => "Part",
            Level::Match => "Match",
            Level::Set => "Set",
        };
        f.write_str(name)
    }
}

/// A recognized title format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TitleFormat {
    /// `2014 GSL Season 1 Code S Group A`
    #[serde(rename = "GSL_2014_S1_GROUP")]
    Gsl2014S1Group,
    /// `2014 GSL Season 1 Code S Group A Part 1`
    #[serde(rename = "GSL_2014_S1_GROUP_PART")]
    Gsl2014S1GroupPart,
    /// `Code S Group A Match1 Set2`, optionally with the season before or after it and a
    /// trailing `.mp4`.
    #[serde(rename = "GSL_2014_S1_GROUP_MATCHSET")]
    Gsl2014S1GroupMatchSet,
}

impl TitleFormat {
    /// Every known format, least specific first.
    pub const ALL: [TitleFormat; 3] = [
        TitleFormat::Gsl2014S1Group,
        TitleFormat::Gsl2014S1GroupPart,
        TitleFormat::Gsl2014S1GroupMatchSet,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TitleFormat::Gsl2014S1Group => "GSL_2014_S1_GROUP",
            TitleFormat::Gsl2014S1GroupPart => "GSL_2014_S1_GROUP_PART",
            TitleFormat::Gsl2014S1GroupMatchSet => "GSL_2014_S1_GROUP_MATCHSET",
        }
    }

    /// The levels filled in by this format's captures, outermost first.
    pub fn hierarchy(self) -> &'static [Level] {
        match self {
            TitleFormat::Gsl2014S1Group => &[Level::League, Level::Group],
            TitleFormat::Gsl2014S1GroupPart => &[Level::League, Level::Group, Level::Part],
            TitleFormat::Gsl2014S1GroupMatchSet => {
                &[Level::League, Level::Group, Level::Match, Level::Set]
            }
        }
    }

    fn regex(self) -> &'static Regex {
        static GROUP: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^2014 GSL Season 1 (Code [AS]) Group ([A-Za-z0-9_]+)$")
                .expect("group title pattern is valid")
        });
        static GROUP_PART: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^2014 GSL Season 1 (Code [AS]) Group ([A-Za-z0-9_]+) Part ([0-9]+)$")
                .expect("group part title pattern is valid")
        });
        static GROUP_MATCHSET: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(concat!(
                r"^(?:2014 GSL Season 1 )?(Code [AS]) Group ([A-Za-z0-9_]+) ",
                r"[Mm]atch([0-9]+) [Ss]et([0-9]+)(?:, 2014 GSL Season 1)?(?:\.mp4)?$",
            ))
            .expect("match set title pattern is valid")
        });

        match self {
            TitleFormat::Gsl2014S1Group => &*GROUP,
            TitleFormat::Gsl2014S1GroupPart => &*GROUP_PART,
            TitleFormat::Gsl2014S1GroupMatchSet => &*GROUP_MATCHSET,
        }
    }
}

/// Where a title sits in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTitle {
    pub format: TitleFormat,
    /// One value per level of [`TitleFormat::hierarchy`], in the same order.
    pub descriptor: Vec<(Level, String)>,
}

impl ParsedTitle {
    pub fn get(&self, level: Level) -> Option<&str> {
        self.descriptor
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, v)| v.as_str())
    }

    /// Renders the levels from `start` on, e.g. `Code S Group A Part 1` for `start == 0`
    /// and `Group A Part 1` for `start == 1`. The league is written without its level name.
    pub fn pretty(&self, start: usize) -> String {
        self.descriptor
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, (level, value))| {
                if i == 0 {
                    value.clone()
                } else {
                    format!("{level} {value}")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Matches `title` against every [`TitleFormat`], least specific first.
pub fn parse_title(title: &str) -> Option<ParsedTitle> {
    TitleFormat::ALL.into_iter().find_map(|format| {
        let captures = format.regex().captures(title)?;
        let descriptor = format
            .hierarchy()
            .iter()
            .zip(captures.iter().skip(1))
            .map(|(&level, m)| {
                let value = m.map_or_else(String::new, |m| m.as_str().to_string());
                (level, value)
            })
            .collect();
        Some(ParsedTitle { format, descriptor })
    })
}

/// Videos split by whether their title could be placed in the hierarchy.
///
/// Every video handed to [`parse_video_titles`] ends up in exactly one of the two lists.
#[derive(Debug, Default)]
pub struct TitleIndex<'a> {
    pub parsed: Vec<(&'a Video, ParsedTitle)>,
    /// Includes videos without a title.
    pub unparsed: Vec<&'a Video>,
}

/// Parses the title of each of `videos`, keeping their order.
pub fn parse_video_titles(videos: &[Video]) -> TitleIndex<'_> {
    let mut index = TitleIndex::default();
    for video in videos {
        match parse_title(&video.title) {
            Some(parsed) => index.parsed.push((video, parsed)),
            None => {
                if video.title.is_empty() {
                    tracing::debug!(id = %video.id, "video has no title");
                } else {
                    tracing::warn!(
                        id = %video.id,
                        title = %video.title,
                        url = %video.url,
                        "could not parse video title"
                    );
                }
                index.unparsed.push(video);
            }
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn levels(parsed: &ParsedTitle) -> Vec<(Level, &str)> {
        parsed
            .descriptor
            .iter()
            .map(|(l, v)| (*l, v.as_str()))
            .collect()
    }

    #[test]
    fn group() {
        let parsed = parse_title("2014 GSL Season 1 Code A Group K").unwrap();
        assert_eq!(parsed.format, TitleFormat::Gsl2014S1Group);
        assert_eq!(
            levels(&parsed),
            vec![(Level::League, "Code A"), (Level::Group, "K")]
        );
    }

    #[test]
    fn group_part() {
        let parsed = parse_title("2014 GSL Season 1 Code S Group A Part 12").unwrap();
        assert_eq!(parsed.format, TitleFormat::Gsl2014S1GroupPart);
        assert_eq!(
            levels(&parsed),
            vec![
                (Level::League, "Code S"),
                (Level::Group, "A"),
                (Level::Part, "12")
            ]
        );
        assert_eq!(parsed.get(Level::Part), Some("12"));
        assert_eq!(parsed.get(Level::Match), None);
        assert_eq!(parsed.pretty(0), "Code S Group A Part 12");
        assert_eq!(parsed.pretty(1), "Group A Part 12");
    }

    #[test]
    fn match_set_variants() {
        for title in [
            "Code S Group A Match1 Set1",
            "2014 GSL Season 1 Code S Group A match1 set1",
            "Code S Group A Match1 Set1, 2014 GSL Season 1",
            "Code S Group A match1 Set1.mp4",
        ] {
            let parsed = parse_title(title).unwrap_or_else(|| panic!("{title:?} did not parse"));
            assert_eq!(parsed.format, TitleFormat::Gsl2014S1GroupMatchSet, "{title:?}");
            assert_eq!(parsed.pretty(0), "Code S Group A Match 1 Set 1", "{title:?}");
        }
    }

    #[test]
    fn unknown_titles() {
        for title in [
            "",
            "2014 GSL Season 1 Code B Group A",
            "2013 GSL Season 3 Code S Group A Part 1",
            "2014 GSL Season 1 Code S Group A Part one",
            "GSL Finals Q&A",
            "Code S Group A Match1 Set1 (rebroadcast)",
        ] {
            assert_eq!(parse_title(title), None, "{title:?}");
        }
    }

    #[test]
    fn every_video_is_parsed_or_unparsed() {
        let videos: Vec<Video> = serde_json::from_str(
            r#"[
                {"_id": "a1", "title": "2014 GSL Season 1 Code S Group A Part 1"},
                {"_id": "a2", "title": "Code A Group K match2 set3.mp4"},
                {"_id": "a3", "title": "GSL Finals Q&A"},
                {"_id": "a4", "title": "2014 GSL Season 1 Code A Group B"},
                {"_id": "a5"}
            ]"#,
        )
        .unwrap();

        let index = parse_video_titles(&videos);
        assert_eq!(index.parsed.len() + index.unparsed.len(), videos.len());

        let parsed: Vec<_> = index
            .parsed
            .iter()
            .map(|(v, p)| (v.id.as_str(), p.format.id()))
            .collect();
        assert_eq!(
            parsed,
            vec![
                ("a1", "GSL_2014_S1_GROUP_PART"),
                ("a2", "GSL_2014_S1_GROUP_MATCHSET"),
                ("a4", "GSL_2014_S1_GROUP"),
            ]
        );
        let unparsed: Vec<_> = index.unparsed.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(unparsed, vec!["a3", "a5"]);
    }

    #[test]
    fn parsed_title_serializes_with_format_id() {
        let parsed = parse_title("2014 GSL Season 1 Code S Group A").unwrap();
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::json!({
                "format": "GSL_2014_S1_GROUP",
                "descriptor": [["League", "Code S"], ["Group", "A"]],
            })
        );
    }
}
