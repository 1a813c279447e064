//! Model module - response types for the player endpoints
//!
//! - `types`: devices, playable items, repeat mode
//! - `playback`: player state, currently playing, queue
//! - `decode`: shape validation of raw bodies

mod decode;
mod playback;
mod types;

pub use decode::{decode, decode_required};

pub(crate) use types::DevicesResponse;

pub use types::{
    AlbumRef, ArtistRef, Context, Device, Episode, PlayableItem, RepeatMode, ShowRef, Track,
};

pub use playback::{CurrentlyPlaying, PlayerState, Queue};
