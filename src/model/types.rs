//! Core response types shared by the player endpoints

use std::fmt;

use serde::{Deserialize, Serialize};

/// A Spotify Connect playback target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Absent for some restricted devices
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub volume_percent: Option<u8>,
    pub is_active: bool,
    #[serde(default)]
    pub is_private_session: bool,
    #[serde(default)]
    pub is_restricted: bool,
    #[serde(default)]
    pub supports_volume: bool,
}

/// Envelope returned by `me/player/devices`
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct DevicesResponse {
    pub devices: Vec<Device>,
}

/// Repeat mode, as sent to and reported by the player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    Off,
    Track,
    Context,
}

impl RepeatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::Track => "track",
            RepeatMode::Context => "context",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The album, playlist, artist or show playback was started from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "type")]
    pub context_type: String,
    pub uri: String,
    pub href: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
    pub uri: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub name: String,
    pub uri: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShowRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub publisher: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Local files have no id
    pub id: Option<String>,
    pub uri: String,
    pub name: String,
    pub duration_ms: u64,
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub is_local: bool,
}

impl Track {
    pub fn artist_names(&self) -> Vec<&str> {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub duration_ms: u64,
    pub show: ShowRef,
}

/// Anything the player can play, discriminated by the `type` field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayableItem {
    Track(Track),
    Episode(Episode),
}

impl PlayableItem {
    pub fn name(&self) -> &str {
        match self {
            PlayableItem::Track(track) => &track.name,
            PlayableItem::Episode(episode) => &episode.name,
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            PlayableItem::Track(track) => &track.uri,
            PlayableItem::Episode(episode) => &episode.uri,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            PlayableItem::Track(track) => track.duration_ms,
            PlayableItem::Episode(episode) => episode.duration_ms,
        }
    }
}
