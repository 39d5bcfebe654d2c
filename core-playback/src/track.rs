//! Track model.
//!
//! Tracks are owned by the backend and read-only here. The queue holds them
//! as `Arc<Track>` handles so reordering never clones track data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier of a track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TrackId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A playable track as supplied by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    /// Locator of the audio resource, frequently a pre-signed URL.
    pub audio_url: String,
    pub artwork_url: Option<String>,
    pub lyrics: Option<String>,
    pub play_count: u64,
    pub like_count: u64,
}

impl Track {
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            audio_url: audio_url.into(),
            artwork_url: None,
            lyrics: None,
            play_count: 0,
            like_count: 0,
        }
    }

    pub fn with_artwork(mut self, url: impl Into<String>) -> Self {
        self.artwork_url = Some(url.into());
        self
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_builder() {
        let track = Track::new("t1", "Song", "Artist", "https://cdn/a.mp3")
            .with_artwork("https://cdn/a.jpg")
            .with_lyrics("la la");

        assert_eq!(track.id.as_str(), "t1");
        assert_eq!(track.artwork_url.as_deref(), Some("https://cdn/a.jpg"));
        assert_eq!(track.lyrics.as_deref(), Some("la la"));
        assert_eq!(track.play_count, 0);
    }

    #[test]
    fn test_track_id_serializes_as_string() {
        let id = TrackId::new("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(TrackId::from("abc"), id);
    }
}
