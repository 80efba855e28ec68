//! Google Takeout watch-history extraction.
//!
//! Turns a `watch-history.json` export into input rows for enrichment. Only
//! YouTube Music plays are kept, and the decorations Takeout adds to titles
//! and channel names are removed so they do not spoil the catalog search.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use serde::Deserialize;

use linernotes_core::model::InputRow;

/// `header` value of YouTube Music events.
pub const YOUTUBE_MUSIC_HEADER: &str = "YouTube Music";

/// `source` recorded on rows extracted from watch history.
pub const WATCH_HISTORY_SOURCE: &str = "watch_history";

const WATCHED_PREFIX: &str = "Watched ";

#[allow(clippy::expect_used)]
static TOPIC_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*Topic\s*$").expect("topic suffix pattern"));

/// One event of a Takeout `watch-history.json` export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchEvent {
    pub header: Option<String>,
    pub title: Option<String>,
    pub title_url: Option<String>,
    pub subtitles: Option<Vec<Subtitle>>,
    pub time: Option<String>,
}

/// Channel reference attached to a watch event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Subtitle {
    pub name: Option<String>,
    pub url: Option<String>,
}

impl WatchEvent {
    pub fn is_youtube_music(&self) -> bool {
        self.header.as_deref() == Some(YOUTUBE_MUSIC_HEADER)
    }

    /// Name of the first channel, which Takeout uses for the artist.
    pub fn artist(&self) -> Option<&str> {
        self.subtitles.as_ref()?.first()?.name.as_deref()
    }

    /// Input row for a YouTube Music play; `None` for any other event.
    pub fn to_input_row(&self) -> Option<InputRow> {
        if !self.is_youtube_music() {
            return None;
        }

        Some(InputRow {
            track_id: self.title_url.as_deref().and_then(video_id),
            title: self.title.as_deref().map(clean_title),
            artist: self.artist().map(clean_artist),
            album: None,
            source: Some(WATCH_HISTORY_SOURCE.to_string()),
        })
    }
}

/// YouTube Music plays as input rows, in export order.
pub fn extract_watch_history(events: &[WatchEvent]) -> Vec<InputRow> {
    events.iter().filter_map(WatchEvent::to_input_row).collect()
}

/// Strip the `"Watched "` prefix Takeout puts in front of every title.
pub fn clean_title(title: &str) -> String {
    title.strip_prefix(WATCHED_PREFIX).unwrap_or(title).to_string()
}

/// Trim the artist and strip the `" - Topic"` suffix of auto-generated
/// artist channels.
pub fn clean_artist(artist: &str) -> String {
    TOPIC_SUFFIX.replace(artist.trim(), "").into_owned()
}

/// The `v` query parameter of a YouTube (Music) watch URL.
pub fn video_id(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Watched Girl!"), "Girl!");
        assert_eq!(clean_title("Girl!"), "Girl!");
        // Only the leading marker goes.
        assert_eq!(clean_title("Watched Watched Me"), "Watched Me");
        assert_eq!(clean_title("I Watched You"), "I Watched You");
    }

    #[test]
    fn test_clean_artist() {
        assert_eq!(clean_artist("Band - Topic"), "Band");
        assert_eq!(clean_artist("  Band -Topic  "), "Band");
        assert_eq!(clean_artist("Band-Topic"), "Band");
        assert_eq!(clean_artist("Topic"), "Topic");
        assert_eq!(clean_artist("Topic - Band"), "Topic - Band");
        assert_eq!(clean_artist(" Band "), "Band");
    }

    #[test]
    fn test_video_id() {
        assert_eq!(
            video_id("https://music.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            video_id("https://music.youtube.com/watch?list=RDAMVM&v=abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(video_id("https://music.youtube.com/watch?v="), None);
        assert_eq!(video_id("https://music.youtube.com/channel/UC123"), None);
        assert_eq!(video_id("not a url"), None);
    }

    #[test]
    fn test_extract_watch_history() {
        let json = r#"[
            {
                "header": "YouTube Music",
                "title": "Watched Girl!",
                "titleUrl": "https://music.youtube.com/watch?v=vid1",
                "subtitles": [{"name": "Band - Topic", "url": "https://www.youtube.com/channel/UC1"}],
                "time": "2025-11-02T10:15:00.000Z",
                "products": ["YouTube"]
            },
            {
                "header": "YouTube",
                "title": "Watched a cooking video",
                "titleUrl": "https://www.youtube.com/watch?v=vid2",
                "subtitles": [{"name": "Chef"}]
            },
            {
                "header": "YouTube Music",
                "title": "Watched Untitled",
                "titleUrl": "https://music.youtube.com/watch?v=vid3"
            }
        ]"#;
        let events: Vec<WatchEvent> = serde_json::from_str(json).unwrap();

        let rows = extract_watch_history(&events);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].track_id.as_deref(), Some("vid1"));
        assert_eq!(rows[0].title.as_deref(), Some("Girl!"));
        assert_eq!(rows[0].artist.as_deref(), Some("Band"));
        assert!(rows[0].album.is_none());
        assert_eq!(rows[0].source.as_deref(), Some(WATCH_HISTORY_SOURCE));
        assert_eq!(rows[0].match_key(), Some(("Girl!", "Band")));

        // No channel: kept, but enrichment will skip it.
        assert_eq!(rows[1].track_id.as_deref(), Some("vid3"));
        assert!(rows[1].artist.is_none());
        assert!(rows[1].match_key().is_none());
    }

    #[test]
    fn test_event_without_title_url() {
        let event = WatchEvent {
            header: Some(YOUTUBE_MUSIC_HEADER.to_string()),
            title: Some("Watched Song".to_string()),
            ..WatchEvent::default()
        };
        let row = event.to_input_row().unwrap();
        assert!(row.track_id.is_none());
        assert_eq!(row.title.as_deref(), Some("Song"));
    }
}
