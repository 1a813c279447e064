use std::collections::HashSet;
use std::fs;

use anyhow::Result;
use chrono::Utc;
use rspotify::Token;

use spotify_playback::config::Config;

pub const SCOPES: &str =
    "user-read-playback-state user-modify-playback-state user-read-currently-playing";

const RESPONSE: &str = r#"
<!doctype html>
<html>
<head><title>Success</title></head>
<body><h1>Authentication Successful!</h1><script>window.close();</script></body>
</html>
"#;

fn oauth_client(config: &Config, interactive: bool) -> Result<librespot_oauth::OAuthClient> {
    let builder = librespot_oauth::OAuthClientBuilder::new(
        &config.client_id,
        &config.redirect_uri,
        SCOPES.split_whitespace().collect(),
    );
    let builder = if interactive {
        builder.open_in_browser().with_custom_message(RESPONSE)
    } else {
        builder
    };
    Ok(builder.build()?)
}

fn save_refresh_token(config: &Config, refresh_token: &str) {
    let result = fs::create_dir_all(&config.cache_dir)
        .and_then(|_| fs::write(config.refresh_token_path(), refresh_token));
    match result {
        Ok(()) => tracing::debug!("Saved refresh token to disk"),
        Err(e) => tracing::warn!(error = %e, "Could not save refresh token"),
    }
}

async fn perform_browser_auth(config: &Config) -> Result<String> {
    tracing::info!("Starting browser-based OAuth flow");
    let token = oauth_client(config, true)?.get_access_token_async().await?;

    save_refresh_token(config, &token.refresh_token);

    tracing::info!("Browser authentication completed successfully");
    Ok(token.access_token)
}

/// Obtain an access token, reusing the cached refresh token when possible.
pub async fn obtain_token(config: &Config) -> Result<Token> {
    let stored_refresh_token = fs::read_to_string(config.refresh_token_path()).ok();

    let access_token = match stored_refresh_token {
        Some(refresh_token) => {
            tracing::info!("Found cached refresh token");
            match oauth_client(config, false)?
                .refresh_token_async(refresh_token.trim())
                .await
            {
                Ok(new_token) => {
                    save_refresh_token(config, &new_token.refresh_token);
                    tracing::debug!("Token refreshed successfully");
                    new_token.access_token
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Cached refresh token failed, re-authenticating");
                    perform_browser_auth(config).await?
                }
            }
        }
        None => {
            tracing::info!("No cached credentials found, starting browser authentication");
            perform_browser_auth(config).await?
        }
    };

    Ok(Token {
        access_token,
        expires_in: chrono::Duration::seconds(3600),
        expires_at: Some(Utc::now() + chrono::Duration::seconds(3600)),
        scopes: SCOPES
            .split_whitespace()
            .map(|s| s.to_string())
            .collect::<HashSet<String>>(),
        refresh_token: None,
    })
}
