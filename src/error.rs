//! Error types for playback requests
//!
//! Client implementations report failures as [`RequestError`]. The adapter
//! decorates them into [`PlayerError`]: anything that carries an HTTP status
//! becomes [`PlayerError::Api`] with an [`ErrorCode`], rendered as
//! `<message> [<code>]`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Machine-readable classification of a status-bearing failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    RateLimited,
    BadResponse,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            429 => ErrorCode::RateLimited,
            _ => ErrorCode::BadResponse,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::RateLimited => "rate_limited",
            ErrorCode::BadResponse => "bad_response",
        }
    }

    /// Read the code back out of a rendered message such as `"Premium required [forbidden]"`.
    pub fn from_message(message: &str) -> Option<Self> {
        let (_, tag) = split_code_tag(message)?;
        tag.parse().ok()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "unauthorized" => Ok(ErrorCode::Unauthorized),
            "forbidden" => Ok(ErrorCode::Forbidden),
            "rate_limited" => Ok(ErrorCode::RateLimited),
            "bad_response" => Ok(ErrorCode::BadResponse),
            other => Err(format!("unknown error code: {other}")),
        }
    }
}

/// What went wrong inside the client layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// The provider answered with an unsuccessful HTTP status
    Status,
    /// A response body could not be parsed
    Parse,
    /// Connection, token or any other client failure
    Transport,
}

/// Failure reported by a [`PlayerClient`](crate::PlayerClient)
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    pub kind: RequestErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl RequestError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: RequestErrorKind::Status,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: RequestErrorKind::Parse,
            status: None,
            message: message.into(),
        }
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind: RequestErrorKind::Transport,
            status,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_parse(&self) -> bool {
        self.kind == RequestErrorKind::Parse
    }
}

/// Errors surfaced by [`PlaybackAdapter`](crate::PlaybackAdapter)
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The request failed with an HTTP status.
    #[error("{message} [{code}]")]
    Api {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    /// A client failure without a status, passed through as reported.
    #[error(transparent)]
    Request(RequestError),

    /// The response body did not have the expected structure.
    #[error("unexpected response from {endpoint}: {source}")]
    Shape {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl PlayerError {
    /// Decorate a client failure. Failures without a status pass through.
    pub fn decorate(error: RequestError) -> Self {
        match error.status {
            Some(status) => PlayerError::Api {
                code: ErrorCode::from_status(status),
                status,
                message: strip_code_tag(&error.message).to_string(),
            },
            None => PlayerError::Request(error),
        }
    }

    /// Decorate again. An already decorated error keeps a single tag.
    pub fn redecorate(self) -> Self {
        match self {
            PlayerError::Api {
                status, message, ..
            } => PlayerError::decorate(RequestError::status(status, message)),
            PlayerError::Request(error) => PlayerError::decorate(error),
            shape => shape,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            PlayerError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            PlayerError::Api { status, .. } => Some(*status),
            PlayerError::Request(error) => error.status,
            PlayerError::Shape { .. } => None,
        }
    }
}

impl From<RequestError> for PlayerError {
    fn from(error: RequestError) -> Self {
        PlayerError::decorate(error)
    }
}

pub type Result<T> = std::result::Result<T, PlayerError>;

/// Remove one trailing `[tag]` (and the whitespace before it) from a message.
pub fn strip_code_tag(message: &str) -> &str {
    match split_code_tag(message) {
        Some((head, _)) => head,
        None => message,
    }
}

fn split_code_tag(message: &str) -> Option<(&str, &str)> {
    let body = message.strip_suffix(']')?;
    // The tag cannot contain a closing bracket, so it starts at the first '['
    // after the last ']' in the body.
    let search_from = body.rfind(']').map_or(0, |i| i + 1);
    let open = search_from + body[search_from..].find('[')?;
    let tag = &body[open + 1..];
    if tag.is_empty() {
        return None;
    }
    Some((body[..open].trim_end(), tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(401, ErrorCode::Unauthorized)]
    #[case(403, ErrorCode::Forbidden)]
    #[case(429, ErrorCode::RateLimited)]
    #[case(400, ErrorCode::BadResponse)]
    #[case(404, ErrorCode::BadResponse)]
    #[case(500, ErrorCode::BadResponse)]
    #[case(503, ErrorCode::BadResponse)]
    fn test_status_mapping(#[case] status: u16, #[case] expected: ErrorCode) {
        assert_eq!(ErrorCode::from_status(status), expected);

        let error = PlayerError::decorate(RequestError::status(status, "Request failed"));
        assert_eq!(error.code(), Some(expected));
        assert_eq!(error.status(), Some(status));
        assert_eq!(error.to_string(), format!("Request failed [{}]", expected));
    }

    #[test]
    fn test_decorate_replaces_existing_tag() {
        let error = PlayerError::decorate(RequestError::status(429, "Slow down [forbidden]"));
        assert_eq!(error.to_string(), "Slow down [rate_limited]");
    }

    #[test]
    fn test_decorate_is_idempotent() {
        let once = PlayerError::decorate(RequestError::status(401, "The access token expired"));
        let rendered_once = once.to_string();
        let twice = once.redecorate();

        assert_eq!(twice.to_string(), rendered_once);
        assert_eq!(twice.to_string().matches('[').count(), 1);

        let from_rendered = PlayerError::decorate(RequestError::status(401, rendered_once.clone()));
        assert_eq!(from_rendered.to_string(), rendered_once);
    }

    #[test]
    fn test_decorate_without_status_passes_through() {
        let original = RequestError::transport(None, "connection reset [by peer]");
        let error = PlayerError::decorate(original.clone());

        assert!(matches!(&error, PlayerError::Request(e) if *e == original));
        assert_eq!(error.to_string(), "connection reset [by peer]");
        assert_eq!(error.code(), None);
    }

    #[test]
    fn test_strip_code_tag() {
        assert_eq!(strip_code_tag("boom [bad_response]"), "boom");
        assert_eq!(strip_code_tag("boom\t [x]"), "boom");
        assert_eq!(strip_code_tag("boom"), "boom");
        assert_eq!(strip_code_tag("boom []"), "boom []");
        assert_eq!(strip_code_tag("a [b] c"), "a [b] c");
        assert_eq!(strip_code_tag("a [b][c]"), "a [b]");
        assert_eq!(strip_code_tag("[only]"), "");
    }

    #[test]
    fn test_code_parses_from_tag() {
        assert_eq!("rate_limited".parse::<ErrorCode>(), Ok(ErrorCode::RateLimited));
        assert_eq!(ErrorCode::Unauthorized.to_string().parse::<ErrorCode>(), Ok(ErrorCode::Unauthorized));
        assert!("teapot".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn test_code_from_message() {
        assert_eq!(
            ErrorCode::from_message("Player command failed [forbidden]"),
            Some(ErrorCode::Forbidden)
        );
        assert_eq!(ErrorCode::from_message("no tag here"), None);
        assert_eq!(ErrorCode::from_message("odd [tag]"), None);
    }
}
