use std::collections::HashSet;

use chrono::Utc;
use mockito::{Matcher, Server};
use rspotify::Token;

use spotify_playback::{DeviceTarget, ErrorCode, PlaybackAdapter, PlayerError, SpotifyClient};

fn token() -> Token {
    Token {
        access_token: "test-token".to_string(),
        expires_in: chrono::Duration::seconds(3600),
        expires_at: Some(Utc::now() + chrono::Duration::seconds(3600)),
        scopes: HashSet::new(),
        refresh_token: None,
    }
}

async fn player(server: &Server) -> PlaybackAdapter<SpotifyClient> {
    let client = SpotifyClient::from_token(token(), &format!("{}/", server.url()))
        .await
        .unwrap();
    PlaybackAdapter::new(client)
}

#[tokio::test]
async fn test_no_content_means_nothing_playing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/me/player")
        .match_header("authorization", "Bearer test-token")
        .with_status(204)
        .create_async()
        .await;

    let player = player(&server).await;
    assert!(player.get_player_state().await.unwrap().is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_status_error_uses_spotify_message() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/me/player/devices")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"status": 401, "message": "The access token expired"}}"#)
        .create_async()
        .await;

    let player = player(&server).await;
    let err = player.list_devices().await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Unauthorized));
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "The access token expired [unauthorized]");
}

#[tokio::test]
async fn test_status_error_without_body() {
    let mut server = Server::new_async().await;
    server
        .mock("PUT", "/me/player/pause")
        .with_status(429)
        .create_async()
        .await;

    let player = player(&server).await;
    let err = player.pause(&DeviceTarget::default()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Spotify API responded with status 429 [rate_limited]"
    );
}

#[tokio::test]
async fn test_enqueue_tolerates_non_json_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/me/player/queue")
        .match_query(Matcher::UrlEncoded(
            "uri".into(),
            "spotify:track:4iV5W9uYEdYUVa79Axb7Rh".into(),
        ))
        .with_status(200)
        .with_body("4iV5W9uYEdYUVa79Axb7Rh queued")
        .create_async()
        .await;

    let player = player(&server).await;
    player
        .queue_uri("spotify:track:4iV5W9uYEdYUVa79Axb7Rh", &DeviceTarget::default())
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_json_body_fails_other_controls() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/me/player/next")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let player = player(&server).await;
    let err = player.next(&DeviceTarget::default()).await.unwrap_err();
    assert!(matches!(err, PlayerError::Request(ref e) if e.is_parse() && e.status.is_none()));
}

#[tokio::test]
async fn test_enqueue_sends_reserved_characters_intact() {
    let uri = "spotify:local:AC%2FDC:Back+In+Black:Hells+Bells:312";
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/me/player/queue")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("uri".into(), uri.into()),
            Matcher::UrlEncoded("device_id".into(), "my dev&x=1".into()),
        ]))
        .with_status(204)
        .create_async()
        .await;
    let stray = server
        .mock("POST", "/me/player/queue")
        .match_query(Matcher::UrlEncoded("x".into(), "1".into()))
        .with_status(500)
        .expect(0)
        .create_async()
        .await;

    let player = player(&server).await;
    player
        .queue_uri(uri, &DeviceTarget::new("my dev&x=1"))
        .await
        .unwrap();
    mock.assert_async().await;
    stray.assert_async().await;
}
