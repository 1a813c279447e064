//! Client handle seam and its rspotify-backed implementation

use std::future::Future;
use std::sync::Arc;

use rspotify::{
    http::{HttpError, Query},
    prelude::*,
    AuthCodeSpotify, ClientError, Config, Token,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::RequestError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
        }
    }
}

/// An authenticated handle able to issue Web API requests.
///
/// `path` is relative to the API base (e.g. `me/player/pause?device_id=abc`).
/// Implementations return `Ok(None)` when the response had no body and
/// report unparseable bodies as [`RequestErrorKind::Parse`](crate::RequestErrorKind::Parse).
pub trait PlayerClient: Send + Sync {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<Option<Value>, RequestError>> + Send;
}

/// Spotify Web API client backed by rspotify
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<AuthCodeSpotify>,
}

impl SpotifyClient {
    pub fn new(client: AuthCodeSpotify) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Build a client around an already obtained access token.
    ///
    /// Token caching and refreshing stay off; the caller owns the token.
    pub async fn from_token(token: Token, api_base_url: &str) -> anyhow::Result<Self> {
        let spotify = AuthCodeSpotify::with_config(
            Default::default(),
            Default::default(),
            Config {
                api_base_url: api_base_url.to_string(),
                token_cached: false,
                token_refreshing: false,
                ..Default::default()
            },
        );

        *spotify
            .token
            .lock()
            .await
            .map_err(|_| anyhow::anyhow!("rspotify token lock poisoned"))? = Some(token);
        tracing::debug!(api_base_url, "rspotify client initialized");

        Ok(Self::new(spotify))
    }
}

impl PlayerClient for SpotifyClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, RequestError> {
        let empty = json!({});
        let payload = body.unwrap_or(&empty);

        let result = match method {
            Method::Get => self.client.api_get(path, &Query::new()).await,
            Method::Put => self.client.api_put(path, payload).await,
            Method::Post => self.client.api_post(path, payload).await,
        };

        match result {
            Ok(text) => parse_body(&text),
            Err(err) => Err(into_request_error(err).await),
        }
    }
}

/// Parse a response body. Empty or whitespace-only bodies mean "no content".
pub(crate) fn parse_body(text: &str) -> Result<Option<Value>, RequestError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| RequestError::parse(format!("invalid JSON in response body: {e}")))
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull `error.message` out of a Spotify error body.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.is_empty())
}

async fn into_request_error(err: ClientError) -> RequestError {
    match err {
        ClientError::ParseJson(e) => RequestError::parse(e.to_string()),
        ClientError::Http(http) => match *http {
            HttpError::StatusCode(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                let message = api_error_message(&body)
                    .unwrap_or_else(|| format!("Spotify API responded with status {status}"));
                RequestError::status(status, message)
            }
            HttpError::Client(e) => {
                RequestError::transport(e.status().map(|s| s.as_u16()), e.to_string())
            }
        },
        other => RequestError::transport(None, other.to_string()),
    }
}
