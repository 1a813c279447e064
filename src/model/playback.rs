//! Playback snapshots returned by the status endpoints

use serde::{Deserialize, Serialize};

use super::types::{Context, Device, PlayableItem, RepeatMode};

/// Full player state from `me/player`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub device: Device,
    pub repeat_state: RepeatMode,
    pub shuffle_state: bool,
    pub context: Option<Context>,
    pub timestamp: i64,
    pub progress_ms: Option<u64>,
    pub is_playing: bool,
    pub item: Option<PlayableItem>,
    pub currently_playing_type: String,
}

/// The active item from `me/player/currently-playing`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    pub context: Option<Context>,
    pub timestamp: i64,
    pub progress_ms: Option<u64>,
    pub is_playing: bool,
    pub item: Option<PlayableItem>,
    pub currently_playing_type: String,
}

/// The user's queue from `me/player/queue`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Queue {
    pub currently_playing: Option<PlayableItem>,
    pub queue: Vec<PlayableItem>,
}

impl Queue {
    pub fn is_empty(&self) -> bool {
        self.currently_playing.is_none() && self.queue.is_empty()
    }
}
