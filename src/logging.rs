//! File-based logging
//!
//! Command output goes to stdout, so tracing output is written to a rolling
//! file instead.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "spotify-playback";
const DEFAULT_FILTER: &str = "spotify_playback=debug,rspotify=info,warn";

/// Initialize the logging system.
///
/// Logs are written to `<log_dir>/spotify-playback.YYYY-MM-DD.log` with daily
/// rotation. `RUST_LOG` overrides the default filter.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<()> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes on drop; keep it for the life of the process.
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(log_dir = %log_dir.display(), "Logging initialized");

    Ok(())
}

/// Record whether a player request succeeded; failures carry the client error.
#[macro_export]
macro_rules! log_api_result {
    ($endpoint:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(endpoint = $endpoint, "Player request succeeded"),
            Err(e) => tracing::error!(
                endpoint = $endpoint,
                status = ?e.status,
                error = %e,
                "Player request failed"
            ),
        }
    };
}

/// Record an outgoing player request. Extra `key = value` fields follow the path.
#[macro_export]
macro_rules! log_api_request {
    ($endpoint:expr, $($field:tt)*) => {
        tracing::debug!(endpoint = $endpoint, $($field)*, "Player request started");
    };
}
