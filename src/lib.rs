//! Spotify remote playback: status queries and controls over the Web API.
//!
//! [`PlaybackAdapter`] wraps any [`PlayerClient`] (normally a
//! [`SpotifyClient`]). Queries validate the response shape and return typed
//! values; controls either succeed or return a [`PlayerError`]. Failures that
//! carry an HTTP status render with a trailing code tag, e.g.
//! `"The access token expired [unauthorized]"`.
//!
//! ```no_run
//! # async fn run(token: rspotify::Token) -> anyhow::Result<()> {
//! use spotify_playback::{DeviceTarget, PlaybackAdapter, SpotifyClient};
//!
//! let client = SpotifyClient::from_token(token, "https://api.spotify.com/v1/").await?;
//! let player = PlaybackAdapter::new(client);
//! if let Some(state) = player.get_player_state().await? {
//!     println!("playing on {}", state.device.name);
//! }
//! player.volume(150, &DeviceTarget::default()).await?; // sent as 100
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod player;

pub use client::{Method, PlayerClient, SpotifyClient};
pub use error::{strip_code_tag, ErrorCode, PlayerError, RequestError, RequestErrorKind, Result};
pub use player::{clamp_volume, DeviceTarget, Offset, PlayOptions, PlaybackAdapter};
