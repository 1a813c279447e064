//! Playback adapter: status queries and control commands

use serde_json::{json, Map, Value};
use url::form_urlencoded;

use crate::client::{Method, PlayerClient};
use crate::error::{PlayerError, RequestError, Result};
use crate::model::{
    decode, decode_required, CurrentlyPlaying, Device, DevicesResponse, PlayerState, Queue,
    RepeatMode,
};
use crate::{log_api_request, log_api_result};

/// Where to start inside a context
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Offset {
    pub position: Option<u32>,
    pub uri: Option<String>,
}

impl Offset {
    fn to_json(&self) -> Value {
        let mut offset = Map::new();
        if let Some(position) = self.position {
            offset.insert("position".into(), json!(position));
        }
        if let Some(uri) = &self.uri {
            offset.insert("uri".into(), json!(uri));
        }
        Value::Object(offset)
    }
}

/// Arguments for [`PlaybackAdapter::play`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayOptions {
    /// Sent as a query parameter, not in the body
    pub device_id: Option<String>,
    pub context_uri: Option<String>,
    pub uris: Option<Vec<String>>,
    pub offset: Option<Offset>,
    pub position_ms: Option<u64>,
}

impl PlayOptions {
    /// Request body for `me/player/play`. Unset fields are left out.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        if let Some(context_uri) = &self.context_uri {
            body.insert("context_uri".into(), json!(context_uri));
        }
        if let Some(uris) = &self.uris {
            body.insert("uris".into(), json!(uris));
        }
        if let Some(offset) = &self.offset {
            body.insert("offset".into(), offset.to_json());
        }
        if let Some(position_ms) = self.position_ms {
            body.insert("position_ms".into(), json!(position_ms));
        }
        Value::Object(body)
    }
}

/// Optional target device for a control command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceTarget {
    pub device_id: Option<String>,
}

impl DeviceTarget {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: Some(device_id.into()),
        }
    }
}

pub fn clamp_volume(volume_percent: i32) -> u8 {
    volume_percent.clamp(0, 100) as u8
}

/// Append form-encoded query parameters, including `device_id` when one is given.
fn endpoint(base: &str, params: &[(&str, String)], device_id: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    if let Some(id) = device_id {
        query.append_pair("device_id", id);
    }
    let query = query.finish();
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

/// Wraps an authenticated client and exposes the player endpoints.
#[derive(Clone)]
pub struct PlaybackAdapter<C> {
    client: C,
}

impl<C: PlayerClient> PlaybackAdapter<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Issue one request, decorating any failure.
    async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        self.call_raw(method, path, body)
            .await
            .map_err(PlayerError::decorate)
    }

    async fn call_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Option<Value>, RequestError> {
        log_api_request!(path, method = method.as_str());
        let result = self.client.request(method, path, body).await;
        log_api_result!(path, result);
        result
    }

    async fn command(&self, method: Method, path: &str, body: Option<&Value>) -> Result<()> {
        self.call(method, path, body).await?;
        Ok(())
    }

    // Status

    /// Current player state, or `None` when nothing is playing.
    pub async fn get_player_state(&self) -> Result<Option<PlayerState>> {
        const ENDPOINT: &str = "me/player";
        match self.call(Method::Get, ENDPOINT, None).await? {
            Some(body) => decode(ENDPOINT, body).map(Some),
            None => {
                tracing::debug!("No active playback session");
                Ok(None)
            }
        }
    }

    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        const ENDPOINT: &str = "me/player/devices";
        let body = self.call(Method::Get, ENDPOINT, None).await?;
        let response: DevicesResponse = decode_required(ENDPOINT, body)?;
        tracing::debug!(count = response.devices.len(), "Found devices");
        Ok(response.devices)
    }

    pub async fn get_queue(&self) -> Result<Queue> {
        const ENDPOINT: &str = "me/player/queue";
        let body = self.call(Method::Get, ENDPOINT, None).await?;
        decode_required(ENDPOINT, body)
    }

    /// Currently playing item, or `None` when idle.
    pub async fn get_currently_playing(&self) -> Result<Option<CurrentlyPlaying>> {
        const ENDPOINT: &str = "me/player/currently-playing";
        match self.call(Method::Get, ENDPOINT, None).await? {
            Some(body) => decode(ENDPOINT, body).map(Some),
            None => Ok(None),
        }
    }

    // Controls

    pub async fn play(&self, options: &PlayOptions) -> Result<()> {
        let path = endpoint("me/player/play", &[], options.device_id.as_deref());
        self.command(Method::Put, &path, Some(&options.body())).await
    }

    pub async fn pause(&self, target: &DeviceTarget) -> Result<()> {
        let path = endpoint("me/player/pause", &[], target.device_id.as_deref());
        self.command(Method::Put, &path, None).await
    }

    pub async fn next(&self, target: &DeviceTarget) -> Result<()> {
        let path = endpoint("me/player/next", &[], target.device_id.as_deref());
        self.command(Method::Post, &path, None).await
    }

    pub async fn previous(&self, target: &DeviceTarget) -> Result<()> {
        let path = endpoint("me/player/previous", &[], target.device_id.as_deref());
        self.command(Method::Post, &path, None).await
    }

    pub async fn seek(&self, position_ms: u64, target: &DeviceTarget) -> Result<()> {
        let path = endpoint(
            "me/player/seek",
            &[("position_ms", position_ms.to_string())],
            target.device_id.as_deref(),
        );
        self.command(Method::Put, &path, None).await
    }

    pub async fn shuffle(&self, state: bool, target: &DeviceTarget) -> Result<()> {
        let path = endpoint(
            "me/player/shuffle",
            &[("state", state.to_string())],
            target.device_id.as_deref(),
        );
        self.command(Method::Put, &path, None).await
    }

    pub async fn repeat(&self, state: RepeatMode, target: &DeviceTarget) -> Result<()> {
        let path = endpoint(
            "me/player/repeat",
            &[("state", state.to_string())],
            target.device_id.as_deref(),
        );
        self.command(Method::Put, &path, None).await
    }

    /// Set the volume. Values outside 0..=100 are clamped before sending.
    pub async fn volume(&self, volume_percent: i32, target: &DeviceTarget) -> Result<()> {
        let volume = clamp_volume(volume_percent);
        if volume as i32 != volume_percent {
            tracing::debug!(requested = volume_percent, volume, "Clamped volume");
        }
        let path = endpoint(
            "me/player/volume",
            &[("volume_percent", volume.to_string())],
            target.device_id.as_deref(),
        );
        self.command(Method::Put, &path, None).await
    }

    pub async fn transfer(&self, device_id: &str, transfer_play: bool) -> Result<()> {
        let body = json!({
            "device_ids": [device_id],
            "play": transfer_play,
        });
        self.command(Method::Put, "me/player", Some(&body)).await
    }

    /// Add an item to the end of the queue.
    ///
    /// The queue endpoint may answer with a body that is not JSON. A parse
    /// failure carrying no status is therefore treated as success; every
    /// other failure is decorated and returned.
    pub async fn queue_uri(&self, uri: &str, target: &DeviceTarget) -> Result<()> {
        let path = endpoint(
            "me/player/queue",
            &[("uri", uri.to_string())],
            target.device_id.as_deref(),
        );
        match self.call_raw(Method::Post, &path, None).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_parse() && e.status.is_none() => {
                tracing::debug!(uri, error = %e, "Ignoring unparseable queue response");
                Ok(())
            }
            Err(e) => Err(PlayerError::decorate(e)),
        }
    }

    /// Find a device by id, or failing that by case-insensitive name.
    pub async fn find_device(&self, id_or_name: &str) -> Result<Option<Device>> {
        let devices = self.list_devices().await?;
        let by_id = devices
            .iter()
            .position(|d| d.id.as_deref() == Some(id_or_name));
        let index = by_id.or_else(|| {
            devices
                .iter()
                .position(|d| d.name.eq_ignore_ascii_case(id_or_name))
        });
        Ok(index.map(|i| devices[i].clone()))
    }
}
